//! Dashboard views.
//!
//! `list` and `add` are protected: they only run when the route guard lets them render.

use anyhow::{bail, Context};
use pokedash_client::{
    model::{Credentials, NewPokemon, Registration},
    Client,
};
use pokedash_common::{
    access_token::decode_unverified,
    guard::{Navigation, RouteGuard},
};

fn require_session(client: &Client) -> anyhow::Result<()> {
    match RouteGuard::new(client.session().clone()).check() {
        Navigation::Render => Ok(()),
        Navigation::Redirect(path) => {
            tracing::debug!(path, "guard redirect");
            bail!("not logged in or session expired; run `pokedash login` first")
        }
    }
}

pub async fn login(client: &Client, username: String, password: String) -> anyhow::Result<()> {
    client
        .login(&Credentials { username, password })
        .await
        .context("login failed")?;

    if let Some(username) = client.session().username()? {
        println!("Logged in as {username}");
    }
    Ok(())
}

pub async fn register(
    client: &Client,
    username: String,
    password: String,
    email: Option<String>,
) -> anyhow::Result<()> {
    client
        .register(&Registration {
            username: username.clone(),
            password,
            email,
            role: None,
        })
        .await
        .context("registration failed")?;

    println!("Registered and logged in as {username}");
    Ok(())
}

pub async fn logout(client: &Client) -> anyhow::Result<()> {
    client.logout().await?;
    println!("Logged out");
    Ok(())
}

pub fn status(client: &Client) -> anyhow::Result<()> {
    let session = client.session();

    match RouteGuard::new(session.clone()).check() {
        Navigation::Render => {
            let username = session.username()?.unwrap_or_else(|| "unknown".to_string());
            let role = session.role()?.unwrap_or_else(|| "none".to_string());
            println!("Logged in as {username} (role: {role})");

            if let Some(claims) = session
                .access_token()?
                .and_then(|token| decode_unverified(&token).ok())
            {
                println!("Access token expires at unix time {}", claims.exp);
            }
        }
        Navigation::Redirect(path) => {
            println!("Not logged in (would redirect to {path})");
        }
    }
    Ok(())
}

pub async fn list(client: &Client, json: bool) -> anyhow::Result<()> {
    require_session(client)?;

    let pokemons = client
        .pokemons()
        .await
        .context("could not load pokemons")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pokemons)?);
        return Ok(());
    }

    if pokemons.is_empty() {
        println!("No pokemons yet");
    }
    for pokemon in &pokemons {
        let id = pokemon
            .id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{id:>6}  {:<16} {}",
            pokemon.name,
            pokemon.kind.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

pub async fn add(client: &Client, name: String, kind: Option<String>) -> anyhow::Result<()> {
    require_session(client)?;

    let pokemon = client
        .add_pokemon(&NewPokemon { name, kind })
        .await
        .context("could not add pokemon")?;

    println!("Added {}", pokemon.name);
    Ok(())
}

use std::sync::Arc;

use pokedash_client::{
    model::{Credentials, NewPokemon, PokemonId, Registration},
    Client,
};
use pokedash_common::storage::FileStorage;
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::{logged_in, test_client};

fn ash() -> Credentials {
    Credentials {
        username: "ash".to_string(),
        password: "pikachu".to_string(),
    }
}

#[test_log::test(tokio::test)]
async fn login_token_is_sent_with_later_requests() {
    let server = MockServer::start().await;
    let t = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "username": "ash", "password": "pikachu" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc.def.ghi",
            "refreshToken": "r1",
            "role": "trainer",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pokemons"))
        .and(header("authorization", "Bearer abc.def.ghi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Bulbasaur", "type": "grass" },
            { "id": 4, "name": "Charmander", "type": "fire" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let response = t.client.login(&ash()).await.unwrap();
    assert_eq!(response.token, "abc.def.ghi");

    assert_eq!(
        t.session.access_token().unwrap().as_deref(),
        Some("abc.def.ghi")
    );
    assert_eq!(t.session.refresh_token().unwrap().as_deref(), Some("r1"));
    assert_eq!(t.session.username().unwrap().as_deref(), Some("ash"));
    assert_eq!(t.session.role().unwrap().as_deref(), Some("trainer"));

    let pokemons = t.client.pokemons().await.unwrap();
    let names: Vec<_> = pokemons.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Bulbasaur", "Charmander"]);
    assert_eq!(pokemons[1].id, Some(PokemonId::Number(4)));
}

#[test_log::test(tokio::test)]
async fn requests_without_a_session_carry_no_credentials() {
    let server = MockServer::start().await;
    let t = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/pokemons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    t.client.pokemons().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[test_log::test(tokio::test)]
async fn rejected_login_does_not_refresh() {
    let server = MockServer::start().await;
    let t = test_client(&server);
    logged_in(&t.session, "old", Some("r1"));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "fresh" })))
        .expect(0)
        .mount(&server)
        .await;

    let err = t.client.login(&ash()).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(t.session.access_token().unwrap().as_deref(), Some("old"));
    assert!(t.navigator.redirects().is_empty());
}

#[test_log::test(tokio::test)]
async fn register_starts_a_session() {
    let server = MockServer::start().await;
    let t = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "username": "misty",
            "password": "starmie",
            "email": "misty@cerulean.gym",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "accessToken": "a1",
            "username": "Misty",
        })))
        .expect(1)
        .mount(&server)
        .await;

    t.client
        .register(&Registration {
            username: "misty".to_string(),
            password: "starmie".to_string(),
            email: Some("misty@cerulean.gym".to_string()),
            role: None,
        })
        .await
        .unwrap();

    assert_eq!(t.session.access_token().unwrap().as_deref(), Some("a1"));
    assert_eq!(t.session.refresh_token().unwrap(), None);
    assert_eq!(t.session.username().unwrap().as_deref(), Some("Misty"));
}

#[test_log::test(tokio::test)]
async fn add_pokemon_posts_json() {
    let server = MockServer::start().await;
    let t = test_client(&server);
    logged_in(&t.session, "valid", Some("r1"));

    Mock::given(method("POST"))
        .and(path("/pokemons"))
        .and(header("authorization", "Bearer valid"))
        .and(body_json(json!({ "name": "Squirtle", "type": "water" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "7a",
            "name": "Squirtle",
            "type": "water",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pokemon = t
        .client
        .add_pokemon(&NewPokemon {
            name: "Squirtle".to_string(),
            kind: Some("water".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(pokemon.id, Some(PokemonId::Text("7a".to_string())));
}

#[test_log::test(tokio::test)]
async fn logout_clears_the_session_even_when_the_server_fails() {
    let server = MockServer::start().await;
    let t = test_client(&server);
    logged_in(&t.session, "valid", Some("r1"));

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("authorization", "Bearer valid"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    t.client.logout().await.unwrap();

    assert_eq!(t.session.access_token().unwrap(), None);
    assert_eq!(t.session.refresh_token().unwrap(), None);
    assert_eq!(t.session.username().unwrap(), None);
}

#[test_log::test(tokio::test)]
async fn empty_success_body_decodes_as_null() {
    let server = MockServer::start().await;
    let t = test_client(&server);
    logged_in(&t.session, "valid", None);

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let value: serde_json::Value = t
        .client
        .send(pokedash_client::ApiRequest::post("/auth/logout"))
        .await
        .unwrap();
    assert!(value.is_null());
}

#[test_log::test(tokio::test)]
async fn session_file_survives_a_new_client() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "persisted" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pokemons"))
        .and(header("authorization", "Bearer persisted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let first = Client::builder()
        .with_url(server.uri())
        .with_storage(Arc::new(FileStorage::new(&session_file)))
        .build()
        .unwrap();
    first.login(&ash()).await.unwrap();
    drop(first);

    let second = Client::builder()
        .with_url(server.uri())
        .with_storage(Arc::new(FileStorage::new(&session_file)))
        .build()
        .unwrap();
    second.pokemons().await.unwrap();
}

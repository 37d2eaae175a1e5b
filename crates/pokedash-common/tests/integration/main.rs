mod test_route_guard;

use figment::Jail;
use harbor_config::HarborConfig;
use pretty_assertions::assert_eq;

#[test]
fn each_service_url_overrides_independently() {
    Jail::expect_with(|jail| {
        jail.set_env("HARBOR_SERVICES__CATALOG_URL", "https://catalog.example.mx");

        let config = HarborConfig::load().expect("config loads");
        assert_eq!(config.services.catalog_url, "https://catalog.example.mx");
        assert_eq!(config.services.users_url, "http://localhost:8083");
        assert_eq!(config.services.bookings_url, "http://localhost:8082");
        Ok(())
    });
}

#[test]
fn session_settings_override_from_env() {
    Jail::expect_with(|jail| {
        jail.set_env("HARBOR_SESSION__PROFILE_FETCH_ATTEMPTS", "5");
        jail.set_env("HARBOR_SESSION__STORE_PATH", "/tmp/harbor.json");

        let config = HarborConfig::load().expect("config loads");
        assert_eq!(config.session.profile_fetch_attempts, 5);
        assert_eq!(config.session.store_path, "/tmp/harbor.json");
        Ok(())
    });
}

#[test]
fn invalid_env_url_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("HARBOR_SERVICES__USERS_URL", "ftp://users");

        let err = HarborConfig::load().expect_err("ftp scheme rejected");
        assert!(err.to_string().contains("services.users_url"));
        Ok(())
    });
}

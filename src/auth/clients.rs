use oauth2::{
    AuthUrl, ClientId, ClientSecret, EndpointNotSet, EndpointSet, RedirectUrl, TokenUrl,
    basic::BasicClient,
};

use crate::{AppError, AppResult, config::Config};

pub(crate) type CivicClient = BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

#[derive(Clone)]
pub struct Clients {
    civic_client: Option<CivicClient>,
    pub(crate) userinfo_url: String,
}

impl Clients {
    pub fn from_config(config: &Config) -> AppResult<Clients> {
        let Some(identity) = &config.identity else {
            return Ok(Clients::disabled());
        };

        let auth_url = AuthUrl::new(format!("{}/auth", identity.auth_url))?;
        let token_url = TokenUrl::new(format!("{}/token", identity.auth_url))?;
        let redirect_url = RedirectUrl::new(format!("{}/auth/callback", config.public_url))?;

        let client = BasicClient::new(ClientId::new(identity.client_id.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url);
        let client = match &identity.client_secret {
            Some(secret) => client.set_client_secret(ClientSecret::new(secret.clone())),
            None => client,
        };

        Ok(Clients {
            civic_client: Some(client),
            userinfo_url: format!("{}/userinfo", identity.auth_url),
        })
    }

    /// No identity provider; every login attempt is refused.
    pub fn disabled() -> Clients {
        Clients {
            civic_client: None,
            userinfo_url: String::new(),
        }
    }

    pub(crate) fn get_client(&self) -> AppResult<CivicClient> {
        self.civic_client
            .clone()
            .ok_or(AppError::Unavailable("identity provider not configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdentityConfig;

    #[test]
    fn disabled_without_identity_config() {
        let clients = Clients::from_config(&Config::default()).unwrap();
        assert!(matches!(clients.get_client(), Err(AppError::Unavailable(_))));
    }

    #[test]
    fn endpoints_hang_off_the_auth_url() {
        let config = Config {
            identity: Some(IdentityConfig {
                client_id: "client".to_owned(),
                client_secret: None,
                auth_url: "https://auth.example/oauth".to_owned(),
            }),
            ..Config::default()
        };
        let clients = Clients::from_config(&config).unwrap();
        let client = clients.get_client().unwrap();

        assert_eq!(client.auth_uri().as_str(), "https://auth.example/oauth/auth");
        assert_eq!(client.token_uri().as_str(), "https://auth.example/oauth/token");
        assert_eq!(
            client.redirect_uri().map(|u| u.as_str().to_owned()),
            Some("http://localhost:5000/auth/callback".to_owned())
        );
        assert_eq!(clients.userinfo_url, "https://auth.example/oauth/userinfo");
    }
}

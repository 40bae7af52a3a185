//! REST client for the local-mode server

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use shared::validation::validate_file;
use shared::{ApiError, SaveResponse, SpriteList, SystemEntry, SystemFile, SystemList};

use super::{PersistenceError, SystemRepository};

pub struct RemoteRepository {
    base: Url,
    client: Client,
}

impl RemoteRepository {
    pub fn new(base_url: &str) -> Result<Self, PersistenceError> {
        let base =
            Url::parse(base_url).map_err(|e| PersistenceError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(PersistenceError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base,
            client: Client::new(),
        })
    }

    /// `<base>/api/<segments...>`, each segment percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    pub fn sprite_url(&self, name: &str) -> String {
        self.endpoint(&["sprites", name]).to_string()
    }
}

/// Turn non-2xx responses into `PersistenceError::Server`, using the body's
/// `error` field when present
fn check(response: Response) -> Result<Response, PersistenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ApiError>()
        .map(|e| e.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
    Err(PersistenceError::Server {
        status: status.as_u16(),
        message,
    })
}

impl SystemRepository for RemoteRepository {
    fn list(&self) -> Result<Vec<SystemEntry>, PersistenceError> {
        let response = check(self.client.get(self.endpoint(&["systems"])).send()?)?;
        Ok(response.json::<SystemList>()?.systems)
    }

    fn load(&self, filename: &str) -> Result<SystemFile, PersistenceError> {
        let response = check(
            self.client
                .get(self.endpoint(&["systems", filename]))
                .send()?,
        )?;
        let file: SystemFile = response.json()?;
        validate_file(&file)?;
        Ok(file)
    }

    fn save(&self, file: &SystemFile) -> Result<String, PersistenceError> {
        let response = check(
            self.client
                .post(self.endpoint(&["systems"]))
                .json(file)
                .send()?,
        )?;
        let saved: SaveResponse = response.json()?;
        tracing::info!("Saved '{}' to server as {}", file.system.name, saved.filename);
        Ok(saved.filename)
    }

    fn delete(&self, filename: &str) -> Result<(), PersistenceError> {
        check(
            self.client
                .delete(self.endpoint(&["systems", filename]))
                .send()?,
        )?;
        Ok(())
    }

    fn list_sprites(&self) -> Result<Vec<String>, PersistenceError> {
        let response = check(self.client.get(self.endpoint(&["sprites"])).send()?)?;
        Ok(response.json::<SpriteList>()?.sprites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let repo = RemoteRepository::new("http://127.0.0.1:3001").unwrap();
        assert_eq!(
            repo.endpoint(&["systems"]).as_str(),
            "http://127.0.0.1:3001/api/systems"
        );
        assert_eq!(
            repo.sprite_url("sun.png"),
            "http://127.0.0.1:3001/api/sprites/sun.png"
        );
    }

    #[test]
    fn test_segments_are_encoded() {
        let repo = RemoteRepository::new("http://localhost:3001/").unwrap();
        assert_eq!(
            repo.endpoint(&["systems", "my system.json"]).as_str(),
            "http://localhost:3001/api/systems/my%20system.json"
        );
        assert_eq!(
            repo.endpoint(&["systems", "../etc/passwd"]).as_str(),
            "http://localhost:3001/api/systems/..%2Fetc%2Fpasswd"
        );
    }

    #[test]
    fn test_bad_base_url() {
        assert!(matches!(
            RemoteRepository::new("not a url"),
            Err(PersistenceError::InvalidUrl(_))
        ));
        assert!(matches!(
            RemoteRepository::new("mailto:someone@example.com"),
            Err(PersistenceError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_unreachable_server_is_http_error() {
        // port 9 (discard) is closed on test machines
        let repo = RemoteRepository::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(repo.list(), Err(PersistenceError::Http(_))));
    }
}

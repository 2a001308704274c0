use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use vault_template::{Config, Settings};

/// Test helper for creating temporary directories with a token, template and
/// output location
pub struct TestFixture {
    _temp_dir: TempDir,
    pub base_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            base_path,
        }
    }

    pub fn token_path(&self) -> PathBuf {
        self.base_path.join("vault-token")
    }

    pub fn template_path(&self) -> PathBuf {
        self.base_path.join("app.env.tmpl")
    }

    pub fn output_path(&self) -> PathBuf {
        self.base_path.join("app.env")
    }

    pub fn write_token(&self, token: &str) {
        fs::write(self.token_path(), token).unwrap();
    }

    pub fn write_template(&self, template: &str) {
        fs::write(self.template_path(), template).unwrap();
    }

    /// Validated configuration pointing at this fixture's files
    pub fn config(&self, vault_address: &str) -> Config {
        Config::from_settings(Settings {
            vault_address: Some(vault_address.to_string()),
            vault_token_file: Some(self.token_path()),
            template_file: Some(self.template_path()),
            output_file: Some(self.output_path()),
            timeout: None,
        })
        .unwrap()
    }

    pub fn read_output(&self) -> String {
        fs::read_to_string(self.output_path()).unwrap()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

pub mod config {
    use serde::Deserialize;
    use std::path::PathBuf;

    #[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
    pub struct Config {
        #[serde(default = "default_port")]
        pub port: u16,
        #[serde(default = "default_todos_file")]
        pub todos_file: PathBuf,
        #[serde(default = "default_messages_file")]
        pub messages_file: PathBuf,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_environment(config::Environment::default())
        }

        /// Loads configuration from the given environment source.
        pub fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(environment)
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_todos_file() -> PathBuf {
        PathBuf::from("todos.json")
    }

    fn default_messages_file() -> PathBuf {
        PathBuf::from("messages.json")
    }

}

pub mod chat;
pub mod store;
pub mod timestamp;
pub mod todo;
pub mod web;

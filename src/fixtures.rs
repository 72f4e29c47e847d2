#[cfg(test)]
pub mod test {
    use crate::schema::ValueSchema;

    pub fn environment() -> ValueSchema {
        ValueSchema::one_of("NODE_ENV", "Environment", ["development", "staging", "production"])
            .flags(["--environment", "--env", "-e"])
            .default_value("development")
    }

    pub fn hostname() -> ValueSchema {
        ValueSchema::string("SERVER_HOSTNAME", "Server Hostname")
            .flags(["--hostname", "-h"])
            .default_value("localhost")
    }

    pub fn mysql_password() -> ValueSchema {
        ValueSchema::string("MYSQL_PASSWORD", "MySQL Password")
            .flags(["--mysql-password"])
            .masked()
    }

    pub fn port() -> ValueSchema {
        ValueSchema::number("port", "Port").flags(["--port", "-p"])
    }

    pub fn verbose() -> ValueSchema {
        ValueSchema::boolean("verbose", "Verbose").flags(["--verbose", "-v"])
    }

    pub fn name() -> ValueSchema {
        ValueSchema::string("name", "Name").flags(["--name"]).required()
    }

    pub fn log_level() -> ValueSchema {
        ValueSchema::one_of("log_level", "Log Level", ["debug", "info", "warn"])
            .flags(["--log-level"])
    }

    /// The full set used by the environment setup flow.
    pub fn setup_schemas() -> Vec<ValueSchema> {
        vec![environment(), hostname(), mysql_password(), port(), verbose()]
    }

    #[test]
    fn setup_schemas_are_valid() {
        assert!(crate::schema::validate_all(&setup_schemas()).is_ok());
    }
}

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Upload limit is positive
/// - Upload and output directories differ
/// - ffmpeg path is set
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.server.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "server.max_upload_bytes must be greater than 0".to_string(),
        ));
    }

    // Storage validation
    if config.storage.upload_dir == config.storage.output_dir {
        return Err(ConfigError::ValidationError(
            "storage.upload_dir and storage.output_dir must differ".to_string(),
        ));
    }

    // Converter validation
    if config.converter.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "converter.ffmpeg_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

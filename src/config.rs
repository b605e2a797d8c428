use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Infrastructure Classifier";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Port used when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 5000;

/// Environment variable that overrides the listening port.
pub const PORT_ENV: &str = "PORT";

/// Upload ceiling for a whole `/predict` request body (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Lowercase file extensions accepted by `/predict`.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Square edge length (pixels) the classifier was trained on.
pub const IMAGE_SIZE: u32 = 224;

/// Largest width or height accepted when decoding an upload.
pub const MAX_IMAGE_DIMENSION: u32 = 8192;

/// Width of the classifier's probability output.
pub const NUM_CLASSES: usize = 4;

/// File name of the exported classifier inside the models directory.
pub const MODEL_FILE_NAME: &str = "infrastructure_model.onnx";

/// Directory holding the pretrained model artifact.
pub fn models_dir() -> PathBuf {
    PathBuf::from("models")
}

/// Fixed path of the pretrained classifier, read once at startup.
pub fn model_path() -> PathBuf {
    models_dir().join(MODEL_FILE_NAME)
}

/// Directory of static frontend assets served for non-API `GET`s.
pub fn frontend_dir() -> PathBuf {
    PathBuf::from("frontend")
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,infra_classifier_lib=debug"
}

/// Listening port: `PORT` from the environment, else [`DEFAULT_PORT`].
pub fn listen_port() -> u16 {
    parse_port(std::env::var(PORT_ENV).ok().as_deref())
}

fn parse_port(raw: Option<&str>) -> u16 {
    match raw.map(str::trim) {
        None | Some("") => DEFAULT_PORT,
        Some(value) => match value.parse::<u16>() {
            Ok(port) => port,
            Err(e) => {
                tracing::warn!(value, error = %e, "Ignoring invalid {PORT_ENV}, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }
        },
    }
}

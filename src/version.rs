// Build-time identity from Cargo.toml, served on / and /version

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// "netexporter 0.3.0", used in the startup log and the index page title.
pub fn banner() -> String {
    format!("{NAME} {VERSION}")
}

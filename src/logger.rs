//! logger.rs
//! Logger del simulador sobre env_logger.

use env_logger::{Builder, Env};

/// sqlx registra cada sentencia en nivel info; con el tracking de aperturas eso
/// tapa el resto de los logs.
const DEFAULT_FILTER: &str = "info,sqlx::query=warn";

/// `RUST_LOG` reemplaza el filtro por defecto; vacía cuenta como ausente
fn log_filter(rust_log: Option<String>) -> String {
    rust_log
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

pub fn init_logger() {
    let filter = log_filter(std::env::var("RUST_LOG").ok());

    Builder::from_env(Env::default().default_filter_or(filter))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_quiet_sqlx_filter() {
        assert_eq!(log_filter(None), DEFAULT_FILTER);
        assert_eq!(log_filter(Some("  ".into())), DEFAULT_FILTER);
        assert_eq!(log_filter(Some("debug".into())), "debug");
    }
}

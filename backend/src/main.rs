use moon::actix_web::{HttpResponse, Responder, web};
use moon::*;
use shared::{AppConfig, DownMsg, UpMsg};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod dev_catalog;

use dev_catalog::{BillboardQuery, DevCatalog};

// ===== CENTRALIZED DEBUG FLAGS =====
const DEBUG_BACKEND: bool = false; // Backend request/response debugging
const DEBUG_CATALOG: bool = false; // Development catalog requests

// Debug macro for easy toggling
macro_rules! debug_log {
    ($flag:expr, $($arg:tt)*) => {
        if $flag {
            println!($($arg)*);
        }
    };
}

const CONFIG_FILE_PATH: &str = "outdoor.toml";
const CONFIG_PATH_ENV: &str = "OUTDOOR_CONFIG";

async fn frontend() -> Frontend {
    Frontend::new().title("Outdoor").index_by_robots(false)
}

async fn up_msg_handler(req: UpMsgRequest<UpMsg>) {
    let (session_id, cor_id) = (req.session_id, req.cor_id);
    debug_log!(DEBUG_BACKEND, "🔍 BACKEND: Received {:?}", req.up_msg);

    match req.up_msg {
        UpMsg::LoadConfig => {
            load_config(session_id, cor_id).await;
        }
    }
}

async fn send_down_msg(msg: DownMsg, session_id: SessionId, cor_id: CorId) {
    if let Some(session) = sessions::by_session_id().wait_for(session_id).await {
        session.send_down_msg(&msg, cor_id).await;
    } else {
        debug_log!(DEBUG_BACKEND, "🔍 BACKEND: session gone, dropping {:?}", msg);
    }
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_PATH))
}

async fn load_config(session_id: SessionId, cor_id: CorId) {
    let msg = match read_or_create_config() {
        Ok(config) => DownMsg::ConfigLoaded(config),
        Err(error) => {
            eprintln!("❌ CONFIG: {error}");
            DownMsg::ConfigError(error)
        }
    };
    send_down_msg(msg, session_id, cor_id).await;
}

/// Reads the config file, fixing and re-saving out-of-range values. A missing
/// file is replaced by the defaults.
fn read_or_create_config() -> Result<AppConfig, String> {
    let path = config_path();
    match fs::read_to_string(&path) {
        Ok(content) => {
            let mut config = AppConfig::from_toml_str(&content).map_err(|error| error.to_string())?;
            let warnings = config.validate_and_fix();
            if !warnings.is_empty() {
                for warning in &warnings {
                    println!("⚠️ CONFIG: {warning}");
                }
                if let Err(error) = save_config_to_file(&config) {
                    // Keep serving the fixed in-memory config.
                    eprintln!("❌ CONFIG: Failed to save migrated config: {error}");
                }
            }
            Ok(config)
        }
        Err(_) => {
            let config = AppConfig::default();
            save_config_to_file(&config)
                .map_err(|error| format!("Failed to create default config: {error}"))?;
            println!("🔧 CONFIG: Created default {}", path.display());
            Ok(config)
        }
    }
}

fn save_config_to_file(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let toml_content = config.to_toml_string()?;

    let content_with_header = format!(
        "# Outdoor configuration\n\
         # Catalog endpoint and billboard picker tuning\n\
         \n\
         {}",
        toml_content
    );

    fs::write(config_path(), content_with_header)?;
    Ok(())
}

async fn list_regions(catalog: web::Data<DevCatalog>) -> impl Responder {
    debug_log!(DEBUG_CATALOG, "🔍 CATALOG: regions");
    HttpResponse::Ok().json(catalog.regions())
}

async fn list_billboards(
    catalog: web::Data<DevCatalog>,
    query: web::Query<BillboardQuery>,
) -> impl Responder {
    let filter = query.into_inner().into_filter();
    let listing = catalog.listing(&filter);
    debug_log!(DEBUG_CATALOG, "🔍 CATALOG: {:?} -> {} billboards", filter, listing.len());
    HttpResponse::Ok().json(listing)
}

fn load_dev_catalog(config: &AppConfig) -> DevCatalog {
    let path = PathBuf::from(&config.catalog.fixture_path);
    match DevCatalog::load(&path) {
        Ok(catalog) => {
            println!(
                "📋 CATALOG: {} regions, {} billboards from {}",
                catalog.regions().len(),
                catalog.billboard_count(),
                path.display()
            );
            catalog
        }
        Err(error) => {
            eprintln!("❌ CATALOG: {error}; serving an empty catalog");
            DevCatalog::default()
        }
    }
}

#[moon::main]
async fn main() -> std::io::Result<()> {
    // Set panic hook to log all panics
    std::panic::set_hook(Box::new(|panic_info| {
        println!("BACKEND PANIC: {:?}", panic_info);
    }));

    let config = read_or_create_config().unwrap_or_else(|error| {
        eprintln!("❌ CONFIG: {error}; using defaults");
        AppConfig::default()
    });
    let catalog = web::Data::from(Arc::new(load_dev_catalog(&config)));

    // Only a same-origin base path is served here; an absolute URL points the
    // frontend at an external catalog instead.
    let scope_path = config.catalog.api_base_url.clone();
    start(frontend, up_msg_handler, move |cfg| {
        if scope_path.starts_with('/') {
            cfg.app_data(catalog.clone()).service(
                web::scope(&scope_path)
                    .route("/regions", web::get().to(list_regions))
                    .route("/billboards", web::get().to(list_billboards)),
            );
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billboard_query_string_becomes_a_filter() {
        let query = web::Query::<BillboardQuery>::from_query("region_id=r1&search=av%20paulista&limit=5").unwrap();
        let filter = query.into_inner().into_filter();
        assert_eq!(filter.region_id.as_deref(), Some("r1"));
        assert_eq!(filter.search.as_deref(), Some("av paulista"));
        assert_eq!(filter.limit, Some(5));
    }

    #[test]
    fn empty_query_string_lists_everything() {
        let query = web::Query::<BillboardQuery>::from_query("").unwrap();
        let filter = query.into_inner().into_filter();
        assert_eq!(filter.region_id, None);
        assert_eq!(filter.search, None);
    }
}

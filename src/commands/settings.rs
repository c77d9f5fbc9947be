use super::Context;
use crate::config::API_URL_ENV;
use crate::error::Result;

pub fn run(ctx: &mut Context, set_api_url: Option<String>, show: bool) -> Result<()> {
    if let Some(url) = set_api_url {
        ctx.config.set_api_url(&url, &ctx.config_dir)?;
        println!("✔ URL del backend guardada: {}", ctx.config.api_base_url);
    }

    if show || !ctx.config_dir.join("config.json").exists() {
        println!("Directorio:  {}", ctx.config_dir.display());
        println!("Backend:     {}", ctx.config.api_base_url);
        if std::env::var(API_URL_ENV).is_ok() {
            println!("             ({} = {})", API_URL_ENV, ctx.config.api_url());
        }
        println!("Timeout:     {} s", ctx.config.timeout_seconds);
        println!("Descargas:   {}", ctx.config.download_dir().display());
    }
    Ok(())
}

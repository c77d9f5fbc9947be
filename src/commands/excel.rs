use super::Context;
use crate::error::{Result, ViError};
use crate::output::with_spinner;
use dialoguer::Password;
use std::path::{Path, PathBuf};
use vi_common::validate_excel_password;

/// Genera el Excel protegido y lo guarda con el nombre del servidor
pub async fn generate(
    ctx: &Context,
    oi: Option<i64>,
    password: Option<String>,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    ctx.require_auth()?;
    let oi_id = match oi {
        Some(id) => id,
        None => ctx
            .session
            .load_current_oi()
            .map(|c| c.id)
            .ok_or_else(|| vi_common::Error::Validation("Primero guarda el OI.".into()))?,
    };

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Contraseña del Excel")
            .allow_empty_password(true)
            .interact()?,
    };
    let password = validate_excel_password(&password)?;

    let file = with_spinner(
        "Generando Excel...",
        ctx.client.generate_excel(oi_id, &password),
    )
    .await?;

    let dir = output.unwrap_or_else(|| ctx.config.download_dir());
    let path = save(&dir, &file.filename, &file.bytes)?;
    println!("✔ Excel generado: {}", path.display());
    Ok(path)
}

fn save(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    if dir.exists() && !dir.is_dir() {
        return Err(ViError::Config(format!(
            "El destino no es un directorio: {}",
            dir.display()
        )));
    }
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    tracing::debug!("{} bytes escritos en {}", bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("descargas");
        let path = save(&dir, "OI-1.xlsx", b"PK").unwrap();
        assert_eq!(path, dir.join("OI-1.xlsx"));
        assert_eq!(std::fs::read(&path).unwrap(), b"PK");
    }

    #[test]
    fn test_save_rejects_file_target() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("x");
        std::fs::write(&file, "").unwrap();
        assert!(matches!(save(&file, "a.xlsx", b""), Err(ViError::Config(_))));
    }
}

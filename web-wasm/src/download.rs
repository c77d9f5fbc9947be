//! Descarga de archivos generados (Blob + enlace temporal)

use crate::app::{AppContext, ToastKind};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub fn save_bytes(bytes: &[u8], filename: &str, mime: &str) -> Result<(), String> {
    let err = |e: JsValue| format!("No se pudo descargar {}: {:?}", filename, e);

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let opts = BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts).map_err(err)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(err)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "Documento no disponible".to_string())?;
    let body = document
        .body()
        .ok_or_else(|| "Documento sin body".to_string())?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(err)?
        .dyn_into()
        .map_err(|_| "No se pudo crear el enlace".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    body.append_child(&anchor).map_err(err)?;
    anchor.click();
    let _ = body.remove_child(&anchor);
    let _ = Url::revoke_object_url(&url);
    Ok(())
}

/// Pide el Excel protegido de una OI y lo descarga
pub async fn download_excel(ctx: AppContext, oi_id: i64, password: String) {
    let api = ctx.api();
    match ctx.busy(api.generate_excel(oi_id, &password)).await {
        Ok(file) => match save_bytes(&file.bytes, &file.filename, XLSX_MIME) {
            Ok(()) => ctx.notify(
                ToastKind::Success,
                format!("Excel descargado: {}", file.filename),
            ),
            Err(e) => ctx.error(e),
        },
        Err(e) => ctx.error(e.message),
    }
}

//! ApiClient contra el backend falso

mod fake_backend;

use std::time::Duration;
use vi_common::{BancadaDraft, Cell, FlowClass, BlockField, LoginInput, OiCreate};
use vi_registro::{ApiClient, ViError};

fn client(url: &str) -> ApiClient {
    ApiClient::new(url, Duration::from_secs(5)).unwrap()
}

fn authed(url: &str) -> ApiClient {
    client(url).with_token(Some(fake_backend::TOKEN.to_string()))
}

fn oi_payload(code: &str) -> OiCreate {
    OiCreate {
        code: code.into(),
        q3: 2.5,
        alcance: 100,
        pma: 16,
        banco_id: 3,
        tech_number: 101,
    }
}

#[tokio::test]
async fn test_login_normalizes_user_field() {
    let server = fake_backend::start().await;
    let input = LoginInput {
        username: "admin".into(),
        password: fake_backend::PASSWORD.into(),
        banco_id: 3,
    };
    let session = client(&server.url).login(&input).await.unwrap();
    assert_eq!(session.username, "admin");
    assert_eq!(session.banco_id, 3);
    assert_eq!(session.token, fake_backend::TOKEN);
    assert_eq!(session.tech_number, 101);
}

#[tokio::test]
async fn test_login_401_is_invalid_credentials() {
    let server = fake_backend::start().await;
    let input = LoginInput {
        username: "admin".into(),
        password: "mal".into(),
        banco_id: 3,
    };
    let err = client(&server.url).login(&input).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Credenciales inválidas");
}

#[tokio::test]
async fn test_catalogs_without_token() {
    let server = fake_backend::start().await;
    let catalogs = client(&server.url).catalogs().await.unwrap();
    assert_eq!(catalogs.q3, vec![1.6, 2.5, 4.0, 6.3]);
    assert_eq!(catalogs.pma, vec![10, 16]);
    assert_eq!(catalogs.bancos[0].id, 3);
}

#[tokio::test]
async fn test_missing_token_uses_server_detail() {
    let server = fake_backend::start().await;
    let err = client(&server.url).list_oi().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    // fuera del login el 401 muestra el detail del servidor
    assert_eq!(err.to_string(), "Not authenticated");
}

#[tokio::test]
async fn test_create_oi_and_errors() {
    let server = fake_backend::start().await;
    let api = authed(&server.url);

    let created = api.create_oi(&oi_payload("OI-0001-2025")).await.unwrap();
    assert_eq!(created.code, "OI-0001-2025");
    assert_eq!(created.presion_bar, 25.6);

    let err = api.create_oi(&oi_payload("X")).await.unwrap_err();
    assert_eq!(err.to_string(), "Código OI inválido (formato OI-####-YYYY).");

    let mut bad_pma = oi_payload("OI-0002-2025");
    bad_pma.pma = 12;
    let err = api.create_oi(&bad_pma).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.to_string(), "PMA inválido");

    let list = api.list_oi().await.unwrap();
    assert_eq!(list.len(), 1);
    let fetched = api.get_oi(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_oi_not_found() {
    let server = fake_backend::start().await;
    let err = authed(&server.url).get_oi_full(99).await.unwrap_err();
    assert!(matches!(err, ViError::Api { status: Some(404), .. }));
    assert_eq!(err.to_string(), "OI no encontrada");
}

#[tokio::test]
async fn test_bancada_lifecycle() {
    let server = fake_backend::start().await;
    let api = authed(&server.url);
    let oi = api.create_oi(&oi_payload("OI-0003-2025")).await.unwrap();

    let mut draft = BancadaDraft::new(3);
    draft.set_cell(0, Cell::Medidor, "MED0099").unwrap();
    draft
        .set_cell(0, Cell::Value(FlowClass::Q2, BlockField::Volumen), "10")
        .unwrap();
    let payload = draft.to_payload().unwrap();

    let created = api.add_bancada(oi.id, &payload).await.unwrap();
    assert_eq!(created.item, 1);
    assert_eq!(created.rows, 3);
    let rows = created.rows_data.clone().unwrap();
    assert_eq!(rows[2].meter_id(), Some("MED0101"));

    // el cuerpo enviado lleva rows_data con las filas replicadas
    {
        let backend = server.state.lock().unwrap();
        let body = backend.last_bancada_body.as_ref().unwrap();
        assert_eq!(body["medidor"], "MED0099");
        assert_eq!(body["rows_data"][1]["q2"]["c6"], 10.0);
    }

    let full = api.get_oi_full(oi.id).await.unwrap();
    assert_eq!(full.oi.id, oi.id);
    assert_eq!(full.bancadas.len(), 1);

    let mut edited = BancadaDraft::from_read(&full.bancadas[0]);
    edited.set_estado(2).unwrap();
    edited.resize(5).unwrap();
    let updated = api
        .update_bancada(created.id, &edited.to_payload().unwrap())
        .await
        .unwrap();
    assert_eq!(updated.item, 1);
    assert_eq!(updated.estado, 2);
    assert_eq!(updated.rows, 5);

    assert_eq!(api.list_bancadas(oi.id).await.len(), 1);

    api.delete_bancada(created.id).await.unwrap();
    let err = api.delete_bancada(created.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Bancada no encontrada");
    assert!(api.list_bancadas(oi.id).await.is_empty());
}

#[tokio::test]
async fn test_bancadas_list_failure_is_empty() {
    let server = fake_backend::start().await;
    let api = authed(&server.url);
    let oi = api.create_oi(&oi_payload("OI-0004-2025")).await.unwrap();
    api.add_bancada(oi.id, &BancadaDraft::new(1).to_payload().unwrap())
        .await
        .unwrap();

    server.state.lock().unwrap().fail_bancadas_list = true;
    assert!(api.list_bancadas(oi.id).await.is_empty());
}

#[tokio::test]
async fn test_excel_filename_and_bytes() {
    let server = fake_backend::start().await;
    let api = authed(&server.url);
    let oi = api.create_oi(&oi_payload("OI-0005-2025")).await.unwrap();

    let file = api.generate_excel(oi.id, "clave").await.unwrap();
    assert_eq!(file.filename, "VI_OI-0005-2025.xlsx");
    assert!(file.bytes.starts_with(b"PK"));

    server.state.lock().unwrap().excel_without_header = true;
    let file = api.generate_excel(oi.id, "clave").await.unwrap();
    assert_eq!(file.filename, format!("OI-{}.xlsx", oi.id));

    let err = api.generate_excel(oi.id, "").await.unwrap_err();
    assert_eq!(err.to_string(), "Password requerido");
}

#[tokio::test]
async fn test_unreachable_backend() {
    // puerto cerrado: falla de transporte sin status
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = authed(&url).list_oi().await.unwrap_err();
    assert_eq!(err.status(), None);
    assert!(!err.to_string().is_empty());
}

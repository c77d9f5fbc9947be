use super::Context;
use crate::error::Result;
use crate::output::with_spinner;
use dialoguer::{Input, Password, Select};
use vi_common::{login_input, Banco, Catalogs};

pub async fn login(
    ctx: &mut Context,
    username: Option<String>,
    banco: Option<i64>,
    password: Option<String>,
) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => Input::<String>::new().with_prompt("Usuario").interact_text()?,
    };

    let banco_id = match banco {
        Some(id) => Some(id),
        None => {
            let catalogs = with_spinner("Cargando bancos...", ctx.client.catalogs()).await?;
            select_banco(&catalogs.bancos)?
        }
    };

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Contraseña")
            .allow_empty_password(true)
            .interact()?,
    };

    let input = login_input(&username, banco_id, &password)?;
    let auth = with_spinner("Ingresando...", ctx.client.login(&input)).await?;
    ctx.session.save_auth(&auth)?;
    ctx.client.set_token(Some(auth.token.clone()));
    tracing::info!("Sesión iniciada para {}", auth.username);

    println!("✔ {}", auth.banner());
    Ok(())
}

/// `None` si el backend no ofrece bancos
fn select_banco(bancos: &[Banco]) -> Result<Option<i64>> {
    if bancos.is_empty() {
        return Ok(None);
    }
    let items: Vec<&str> = bancos.iter().map(|b| b.name.as_str()).collect();
    let index = Select::new()
        .with_prompt("N° de banco")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(bancos.get(index).map(|b| b.id))
}

/// Borra la sesión y el puntero a la OI activa
pub fn logout(ctx: &Context) -> Result<()> {
    ctx.session.clear_auth();
    ctx.session.clear_current_oi();
    println!("✔ Sesión cerrada");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    match ctx.session.load_auth() {
        Some(auth) => {
            println!("{}", auth.banner());
            if let Some(current) = ctx.session.load_current_oi() {
                println!("OI activa: {} (#{})", current.code, current.id);
            }
        }
        None => println!("Sin sesión. Ejecute `vi login`"),
    }
    Ok(())
}

pub async fn catalogs(ctx: &Context) -> Result<()> {
    let catalogs = with_spinner("Cargando catálogos...", ctx.client.catalogs()).await?;
    print_catalogs(&catalogs);
    Ok(())
}

fn print_catalogs(catalogs: &Catalogs) {
    let join = |values: Vec<String>| values.join(", ");
    println!("Q3:      {}", join(catalogs.q3.iter().map(|v| v.to_string()).collect()));
    println!("Alcance: {}", join(catalogs.alcance.iter().map(|v| v.to_string()).collect()));
    println!("PMA:     {}", join(catalogs.pma.iter().map(|v| v.to_string()).collect()));
    println!("Bancos:");
    for banco in &catalogs.bancos {
        println!("  {:>3}  {}", banco.id, banco.name);
    }
}

//! Pantalla de ingreso

use crate::app::{use_app, ToastKind};
use leptos::prelude::*;
use leptos::task::spawn_local;
use vi_common::{login_input, Banco};

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app();
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (banco, set_banco) = signal(None::<i64>);
    let (bancos, set_bancos) = signal(Vec::<Banco>::new());

    spawn_local(async move {
        match ctx.api().catalogs().await {
            Ok(catalogs) => {
                if banco.get_untracked().is_none() {
                    set_banco.set(catalogs.bancos.first().map(|b| b.id));
                }
                set_bancos.set(catalogs.bancos);
            }
            Err(e) => ctx.error(e.message),
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let input = match login_input(
            &username.get_untracked(),
            banco.get_untracked(),
            &password.get_untracked(),
        ) {
            Ok(input) => input,
            Err(e) => {
                ctx.error(e.to_string());
                return;
            }
        };

        spawn_local(async move {
            let api = ctx.api();
            match ctx.busy(api.login(&input)).await {
                Ok(auth) => {
                    let name = auth.username.clone();
                    ctx.sign_in(auth);
                    ctx.notify(ToastKind::Success, format!("Bienvenido, {}", name));
                }
                Err(e) => ctx.error(e.message),
            }
        });
    };

    view! {
        <div class="row justify-content-center mt-5">
            <div class="col-md-4">
                <div class="card shadow-sm">
                    <div class="card-body">
                        <h4 class="card-title mb-3">"Registro VI"</h4>
                        <form on:submit=on_submit>
                            <div class="mb-3">
                                <label class="form-label" for="username">"Usuario"</label>
                                <input
                                    id="username"
                                    class="form-control"
                                    autocomplete="username"
                                    prop:value=move || username.get()
                                    on:input=move |ev| set_username.set(event_target_value(&ev))
                                />
                            </div>
                            <div class="mb-3">
                                <label class="form-label" for="banco">"N° de banco"</label>
                                <select
                                    id="banco"
                                    class="form-select"
                                    on:change=move |ev| set_banco.set(event_target_value(&ev).parse().ok())
                                >
                                    <option value="" selected=move || banco.get().is_none()>
                                        "Seleccione..."
                                    </option>
                                    <For
                                        each=move || bancos.get()
                                        key=|b| b.id
                                        children=move |b| {
                                            let id = b.id;
                                            view! {
                                                <option value=id.to_string() selected=move || banco.get() == Some(id)>
                                                    {b.name}
                                                </option>
                                            }
                                        }
                                    />
                                </select>
                            </div>
                            <div class="mb-3">
                                <label class="form-label" for="password">"Contraseña"</label>
                                <input
                                    id="password"
                                    type="password"
                                    class="form-control"
                                    autocomplete="current-password"
                                    prop:value=move || password.get()
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                />
                            </div>
                            <button type="submit" class="btn btn-primary w-100">"Ingresar"</button>
                        </form>
                    </div>
                </div>
            </div>
        </div>
    }
}

//! Modal de contraseña para el Excel protegido

use crate::app::use_app;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use vi_common::validate_excel_password;

#[component]
pub fn PasswordModal<FO, FC>(on_confirm: FO, on_cancel: FC) -> impl IntoView
where
    FO: Fn(String) + 'static + Clone + Send + Sync,
    FC: Fn(()) + 'static + Clone + Send + Sync,
{
    let ctx = use_app();
    let (password, set_password) = signal(String::new());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        match validate_excel_password(&password.get_untracked()) {
            Ok(p) => on_confirm(p),
            Err(e) => ctx.error(e.to_string()),
        }
    };

    let close_x = on_cancel.clone();

    view! {
        <div class="modal d-block" tabindex="-1" role="dialog">
            <div class="modal-dialog modal-dialog-centered">
                <form class="modal-content" on:submit=on_submit>
                    <div class="modal-header">
                        <h5 class="modal-title">"Generar Excel"</h5>
                        <button type="button" class="btn-close" on:click=move |_| close_x(())></button>
                    </div>
                    <div class="modal-body">
                        <label class="form-label" for="excel-password">"Contraseña del archivo"</label>
                        <input
                            id="excel-password"
                            type="password"
                            class="form-control"
                            autocomplete="new-password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="modal-footer">
                        <button type="button" class="btn btn-secondary" on:click=move |_| on_cancel(())>
                            "Cancelar"
                        </button>
                        <button type="submit" class="btn btn-primary">"Descargar"</button>
                    </div>
                </form>
            </div>
        </div>
        <div class="modal-backdrop show"></div>
    }
}

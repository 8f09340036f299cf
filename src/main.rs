mod command;
mod components;
mod decode;
mod grid;
mod host;
mod model;
mod settings;
mod state;

use settings::UiSettings;

/// Installs logging. Views are mounted by the embedding page through the exports in `host`.
fn main() {
    let settings = UiSettings::load();

    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default_with_config(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(settings.log_level.into())
                .build(),
        );
    }

    tracing::info!(log_level = ?settings.log_level, "P&T player UI loaded");
}

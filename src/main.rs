//! Demo: recorre los tres funnels con respuestas guionadas, sin red, y
//! muestra lo que cada uno entrega al completar.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use funnel_core::{CompletionAction, FunnelCtx};
use funnelflow::{demo, open_funnel, route_table, AppConfig, FunnelKind};

fn run(kind: FunnelKind, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_funnel(kind.route(), config)?;
    engine.reset();
    let mut ctx = FunnelCtx::new(&mut engine);
    let transitions = ctx.run_script(demo::script(kind))?;
    info!("demo:{kind} steps={} history={}", transitions.len(), engine.history_len());

    // back desde Loading está bloqueado; la carga se resuelve sin esperar
    let done = engine.finish_loading()?;
    match &done.action {
        CompletionAction::Redirect(url) => println!("[{kind}] redirect → {url}"),
        CompletionAction::ShowResults => println!("[{kind}] resultados:\n{}", serde_json::to_string_pretty(&done.answers)?),
    }
    println!("[{kind}] journal: {}", engine.event_variants().join(""));
    Ok(())
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .init();

    let config = AppConfig::offline(std::env::temp_dir().join("funnelflow-demo"));
    for (route, name, namespace) in route_table() {
        println!("{route:<12} {name:<10} {namespace}");
    }
    for kind in FunnelKind::ALL {
        if let Err(e) = run(kind, &config) {
            error!("demo:{kind} failed: {e}");
            std::process::exit(1);
        }
    }
}

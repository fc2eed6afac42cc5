mod input;
mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tokio::runtime::Runtime;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use funnel_adapters::{build_registry, enrich, AdapterConfig, FunnelKind, WebhookClient};
use funnel_core::{AnswerMap, CompletionAction, CompletionState, EngineBuilderInit, EventStore, FunnelCtx,
                  FunnelEngine};
use funnel_persistence::{engine_config_from_env, FileStore, JsonlEventStore, StorageConfig};

use crate::input::{parse_line, Command};

const USAGE: &str = "Uso: funnel-cli [ROTA] [--storage-dir <DIR>] [--journal] [--reset] [--list]";

struct Args {
    route: String,
    storage_dir: Option<PathBuf>,
    journal: bool,
    reset: bool,
    list: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args { route: "/".into(),
                            storage_dir: None,
                            journal: false,
                            reset: false,
                            list: false };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--storage-dir" => {
                i += 1;
                match args.get(i) {
                    Some(dir) => parsed.storage_dir = Some(PathBuf::from(dir)),
                    None => return Err("--storage-dir requiere un valor".into()),
                }
            }
            "--journal" => parsed.journal = true,
            "--reset" => parsed.reset = true,
            "--list" => parsed.list = true,
            "-h" | "--help" => return Err(String::new()),
            flag if flag.starts_with("--") => return Err(format!("flag desconocido: {flag}")),
            route => parsed.route = route.to_string(),
        }
        i += 1;
    }
    Ok(parsed)
}

fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
                             .with_writer(io::stderr)
                             .init();

    let raw: Vec<String> = std::env::args().collect();
    let args = match parse_args(&raw) {
        Ok(a) => a,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("[funnel-cli] {msg}");
            }
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    if args.list {
        for kind in FunnelKind::ALL {
            println!("{:<12} {:<8} {}", kind.route(), kind.name(), kind.namespace());
        }
        return;
    }

    let kind = FunnelKind::from_route(&args.route);
    let adapter_config = AdapterConfig::from_env();
    let registry = match build_registry(kind, &adapter_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("[funnel-cli] registro inválido: {e}");
            std::process::exit(5);
        }
    };
    let client = match WebhookClient::from_config(&adapter_config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[funnel-cli] cliente http: {e}");
            std::process::exit(5);
        }
    };

    let mut storage = StorageConfig::from_env();
    if let Some(dir) = args.storage_dir {
        storage.dir = dir;
    }
    let engine_config = engine_config_from_env();
    info!("cli:start funnel={kind} storage={} journal={}", storage.dir.display(), storage.journal || args.journal);

    let builder = EngineBuilderInit::new(registry).persistence(FileStore::new(storage.dir.clone()))
                                                  .config(engine_config);
    let result = if storage.journal || args.journal {
        let journal = JsonlEventStore::new(storage.journal_dir());
        run(builder.event_store(journal).build(), &client, args.reset)
    } else {
        run(builder.build(), &client, args.reset)
    };
    if let Err(e) = result {
        eprintln!("[funnel-cli] error: {e}");
        std::process::exit(5);
    }
}

fn run<E: EventStore>(mut engine: FunnelEngine<FileStore, E>, client: &WebhookClient, reset: bool) -> io::Result<()> {
    let rt = Runtime::new()?;
    if reset {
        engine.reset();
    }
    if !engine.answers().is_empty() {
        println!("Respostas anteriores carregadas ({} campos). Use :reset para recomeçar.", engine.answers().len());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if engine.completion_state() == CompletionState::Loading {
            println!("\nCarregando...");
            std::thread::sleep(engine.registry().loading_duration());
            let done = match engine.finish_loading() {
                Ok(done) => done,
                Err(e) => {
                    warn!("cli:finish_loading err={e}");
                    continue;
                }
            };
            match &done.action {
                CompletionAction::Redirect(url) => println!("Redirecionando para {url}"),
                CompletionAction::ShowResults => {
                    println!("Resultados:");
                    println!("{}", serde_json::to_string_pretty(&done.answers)?);
                }
            }
            print!(":back para voltar, Enter para sair > ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else { return Ok(()) };
            if !wants_back(&line?) {
                return Ok(());
            }
            if let Err(e) = engine.back() {
                println!("{e}");
                return Ok(());
            }
            continue;
        }

        let view = engine.current_view();
        match &view {
            Ok(v) => print!("{}", render::render(v)),
            Err(e) => println!("Funil indisponível: {e}. Use :reset ou :quit."),
        }
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { return Ok(()) };
        let line = line?;

        let command = match &view {
            Ok(v) => parse_line(v, &line),
            // funil quebrado: só reset ou sair
            Err(_) => match line.trim() {
                ":reset" => Command::Reset,
                ":quit" | ":q" => Command::Quit,
                _ => Command::Invalid("use :reset ou :quit".into()),
            },
        };
        match command {
            Command::Quit => return Ok(()),
            Command::Reset => {
                engine.reset();
                println!("Respostas apagadas.");
            }
            Command::Back => match engine.back() {
                Ok(true) => {}
                Ok(false) => println!("Já está no primeiro passo."),
                Err(e) => println!("{e}"),
            },
            Command::Invalid(msg) => println!("{msg}"),
            Command::Answer(raw) => submit(&mut engine, client, &rt, raw),
        }
    }
}

/// Tras la completitud sólo se ofrece volver.
fn wants_back(line: &str) -> bool {
    matches!(line.trim(), ":back" | ":b")
}

/// normalize → colaborador (si el step lo pide) → motor.
fn submit<E: EventStore>(engine: &mut FunnelEngine<FileStore, E>, client: &WebhookClient, rt: &Runtime, raw: AnswerMap) {
    let mut ctx = FunnelCtx::new(engine);
    let delta = match ctx.engine.current_step() {
        Ok(step) => step.normalize(raw),
        Err(e) => {
            println!("{e}");
            return;
        }
    };
    let delta = match ctx.pending_enrichment(&delta) {
        Some(kind) => {
            debug!("cli:enrich kind={kind:?}");
            let answers = ctx.engine.answers().clone();
            rt.block_on(enrich(kind, client, client, &answers, delta))
        }
        None => delta,
    };
    match ctx.answer(delta) {
        Ok(Some(t)) => debug!("cli:transition {t:?}"),
        Ok(None) => println!("Resposta inválida para este passo."),
        Err(e) => println!("Erro: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("funnel-cli").chain(list.iter().copied()).map(str::to_string).collect()
    }

    #[test]
    fn route_and_flags() {
        let a = parse_args(&args(&["/health", "--storage-dir", "/tmp/x", "--reset"])).unwrap();
        assert_eq!(a.route, "/health");
        assert_eq!(a.storage_dir, Some(PathBuf::from("/tmp/x")));
        assert!(a.reset);
        assert!(!a.journal);
        let a = parse_args(&args(&[])).unwrap();
        assert_eq!(FunnelKind::from_route(&a.route), FunnelKind::Onboarding);
    }

    #[test]
    fn only_back_reopens_after_completion() {
        assert!(wants_back(" :back "));
        assert!(wants_back(":b"));
        assert!(!wants_back(""));
        assert!(!wants_back(":reset"));
    }

    #[test]
    fn bad_flags_are_usage_errors() {
        assert!(parse_args(&args(&["--storage-dir"])).is_err());
        assert!(parse_args(&args(&["--nope"])).is_err());
        assert_eq!(parse_args(&args(&["--help"])).err(), Some(String::new()));
    }
}

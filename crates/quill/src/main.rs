use anyhow::Result;
use log::LevelFilter;
use quill::App;
use std::path::PathBuf;

const USAGE: &str = "usage: quill [--save] [PATH]...";

struct Args {
    paths: Vec<PathBuf>,
    save: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Args>> {
    let mut parsed = Args {
        paths: Vec::new(),
        save: false,
    };
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--save" => parsed.save = true,
            flag if flag.starts_with("--") => {
                return Err(anyhow::anyhow!("unknown option: {}\n{}", flag, USAGE));
            }
            path => parsed.paths.push(PathBuf::from(path)),
        }
    }
    Ok(Some(parsed))
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Warn);
        logger.filter_module("quill", LevelFilter::Info);
    }
    logger.init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let mut app = App::load().await?;
    log::debug!("engine options: {:?}", app.config.engine);

    if args.paths.is_empty() {
        log::info!("No file specified, starting with empty buffer");
    } else {
        app.open_files(args.paths).await?;
    }

    if args.save {
        app.save_all();
    }

    print!("{}", app.render_table());

    for message in app.status.messages() {
        eprintln!("{}", message);
    }

    if app.status.has_errors() {
        anyhow::bail!("some files could not be opened");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_paths_and_save_flag() {
        let parsed = parse_args(args(&["a.txt", "--save", "dir/b.txt"]))
            .unwrap()
            .unwrap();
        assert!(parsed.save);
        assert_eq!(
            parsed.paths,
            vec![PathBuf::from("a.txt"), PathBuf::from("dir/b.txt")]
        );
    }

    #[test]
    fn test_parse_help_and_unknown_flag() {
        assert!(parse_args(args(&["--help"])).unwrap().is_none());
        let err = parse_args(args(&["--bogus"])).err().unwrap();
        assert!(err.to_string().contains("unknown option: --bogus"));
    }
}

use std::env;
use std::error::Error;
use std::path::PathBuf;

use log::{debug, info, trace};
use trr::prelude::*;

/// Command line: `trr [--config <file>] [--headless <out.png>] [mesh]`.
#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    headless: Option<PathBuf>,
    mesh: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = iter.next().ok_or("--config needs a path")?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--headless" => {
                let value = iter.next().ok_or("--headless needs an output path")?;
                parsed.headless = Some(PathBuf::from(value));
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option '{flag}'")),
            path => parsed.mesh = Some(PathBuf::from(path)),
        }
    }
    Ok(parsed)
}

fn run_window(config: &Config, engine: &mut Engine) -> Result<(), String> {
    let display = &config.display;
    let mut window = Window::new(
        &display.title,
        display.width,
        display.height,
        config.render.channel_order,
    )?;
    let mut limiter = FrameLimiter::new(display.fps);
    let mut controls = Controls::new();

    while controls.running {
        limiter.begin_frame();

        window.poll_input(&mut controls);
        engine.update(&controls);
        engine.render();
        window.present(engine.frame_buffer())?;

        let frame_time = limiter.end_frame();
        trace!("ft: {} ms", frame_time.as_millis());
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&args)?;

    let config_path = args
        .config
        .unwrap_or_else(|| PathBuf::from(trr::config::DEFAULT_CONFIG_PATH));
    let mut config = Config::load_or_default(&config_path)?;
    if let Some(mesh) = args.mesh {
        config.mesh.path = mesh;
    }
    debug!("{config:?}");

    info!("System has {} threads", rayon::current_num_threads());

    let mut engine = Engine::new(&config);
    engine.set_mesh(Mesh::load_or_empty(&config.mesh.path));

    if let Some(output) = args.headless {
        engine.update(&Controls::new());
        engine.render();
        engine.frame_buffer().save(&output)?;
        info!("Wrote {}", output.display());
        return Ok(());
    }

    run_window(&config, &mut engine)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_every_option() {
        let parsed =
            parse_args(&args(&["--config", "a.ini", "--headless", "out.png", "m.obj"])).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("a.ini")));
        assert_eq!(parsed.headless, Some(PathBuf::from("out.png")));
        assert_eq!(parsed.mesh, Some(PathBuf::from("m.obj")));
    }

    #[test]
    fn no_arguments_means_defaults() {
        assert_eq!(parse_args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn rejects_bad_options() {
        assert!(parse_args(&args(&["--config"])).is_err());
        assert!(parse_args(&args(&["--fullscreen"])).is_err());
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logger;

use anyhow::{Context, Result};
use config::Config;
use regform_app::{DialPlanWidget, FormOptions, FormState, InitialState};
use regform_data::Loader;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `regform --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    logger::init(config.log_level()?, &config.log_file()?)?;

    let sources = config.reference_sources()?;
    let loader = Loader::new(config.data_timeout()?).with_context(|| {
        format!(
            "invalid [data] config in {}; fix the timeout value",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        let data = loader.load_strict(&sources).with_context(|| {
            format!(
                "load reference data -- check [data].countries and [data].regions in {}",
                options.config_path.display()
            )
        })?;
        println!(
            "ok: {} countries, {} region entries",
            data.countries.len(),
            data.regions.len()
        );
        return Ok(());
    }
    let data = loader.load(&sources);

    let initial = initial_state(&options, &config);
    let widget = DialPlanWidget::new(&config.phone_widget_config(&data, &initial.country));
    let form_options = FormOptions {
        ready_fallback: config.ready_fallback()?,
        ..FormOptions::default()
    };

    let (mut state, startup) = FormState::start(data, &initial, Some(widget), form_options);
    regform_tui::run_form(&mut state, startup)
}

/// Flags win over `[form]` values; the country falls back to the built-in default.
fn initial_state(options: &CliOptions, config: &Config) -> InitialState {
    InitialState::from_defaults(
        options.country.as_deref().or(config.form.country.as_deref()),
        options.province.as_deref().or(config.form.province.as_deref()),
        options.city.as_deref().or(config.form.city.as_deref()),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    country: Option<String>,
    province: Option<String>,
    city: Option<String>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        country: None,
        province: None,
        city: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            flag @ ("--country" | "--province" | "--city") => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{flag} requires a name"))?
                    .as_ref()
                    .to_owned();
                match flag {
                    "--country" => options.country = Some(value),
                    "--province" => options.province = Some(value),
                    _ => options.city = Some(value),
                }
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("regform");
    println!("  --config <path>          Use a specific config path");
    println!("  --country <name>         Initially selected country");
    println!("  --province <name>        Initially selected province");
    println!("  --city <name>            Initially selected city");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config and load reference data, then exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, Config, initial_state, parse_cli_args};
    use anyhow::Result;
    use regform_app::DEFAULT_INITIAL_COUNTRY;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/regform-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                country: None,
                province: None,
                city: None,
                print_config_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--province"], default_options_path())
            .expect_err("missing province value should fail");
        assert!(error.to_string().contains("--province requires a name"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_initial_selection() -> Result<()> {
        let options = parse_cli_args(
            vec!["--country", "México", "--province", "Jalisco", "--city", "Zapopan"],
            default_options_path(),
        )?;
        assert_eq!(options.country.as_deref(), Some("México"));
        assert_eq!(options.province.as_deref(), Some("Jalisco"));
        assert_eq!(options.city.as_deref(), Some("Zapopan"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn initial_state_prefers_flags_over_config() -> Result<()> {
        let mut config = Config::default();
        config.form.country = Some("Colombia".to_owned());
        config.form.province = Some("Antioquia".to_owned());
        config.form.city = Some("Medellín".to_owned());

        let options = parse_cli_args(vec!["--city", "Envigado"], default_options_path())?;
        let initial = initial_state(&options, &config);
        assert_eq!(initial.country, "Colombia");
        assert_eq!(initial.province, "Antioquia");
        assert_eq!(initial.city, "Envigado");
        Ok(())
    }

    #[test]
    fn initial_state_defaults_country_when_unset() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        let initial = initial_state(&options, &Config::default());
        assert_eq!(initial.country, DEFAULT_INITIAL_COUNTRY);
        assert!(!initial.has_province());
        assert!(!initial.has_city());
        Ok(())
    }
}

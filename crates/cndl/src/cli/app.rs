use std::time::Duration;

use clap::{ArgAction, Parser};
use cndl_fetch::ClientSetting;
use cndl_source::Variant;
use url::Url;

use crate::run::Request;

#[derive(Clone, Debug, Parser)]
#[command(
    name = "cndl",
    version = env!("CARGO_PKG_VERSION"),
    about = "Download VS Code through the vscode.cdn.azure.cn mirror",
    long_about = None
)]
pub struct App {
    #[arg(value_enum, value_name = "TYPE", help = "The download type")]
    pub variant: Variant,

    #[arg(short, long, help = "Print url only")]
    pub print_only: bool,

    #[arg(
        long = "proxy",
        value_name = "URL",
        help = "Proxy for http/https requests, by proxy scheme"
    )]
    pub proxies: Vec<Url>,

    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 30,
        help = "Request timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
}

impl App {
    pub fn request(&self) -> Request {
        Request {
            variant: self.variant,
            print_only: self.print_only,
        }
    }

    pub fn client_setting(&self) -> ClientSetting {
        ClientSetting {
            proxies: (!self.proxies.is_empty()).then(|| self.proxies.clone()),
            timeout: Duration::from_secs(self.timeout),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn command_is_consistent() {
        App::command().debug_assert();
    }

    #[test]
    fn parses_every_keyword() {
        for v in Variant::all() {
            let app = App::try_parse_from(["cndl", v.keyword()]).unwrap();
            assert_eq!(app.variant, v);
            assert!(!app.print_only);
        }
    }

    #[test]
    fn print_only_flags() {
        let short = App::try_parse_from(["cndl", "deb", "-p"]).unwrap();
        let long = App::try_parse_from(["cndl", "--print-only", "server"]).unwrap();
        assert!(short.print_only);
        assert!(long.print_only);
        assert_eq!(long.variant, Variant::Server);
    }

    #[test]
    fn unknown_type_is_usage_error() {
        let err = App::try_parse_from(["cndl", "linux-arm64"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn type_is_required() {
        let err = App::try_parse_from(["cndl"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn client_setting_from_flags() {
        let app = App::try_parse_from([
            "cndl",
            "mac",
            "--proxy",
            "http://127.0.0.1:3128",
            "--timeout",
            "5",
            "-vv",
        ])
        .unwrap();

        let setting = app.client_setting();
        assert_eq!(setting.timeout, Duration::from_secs(5));
        assert_eq!(setting.proxies.unwrap().len(), 1);
        assert_eq!(app.verbose, 2);
    }

    #[test]
    fn no_proxies_by_default() {
        let app = App::try_parse_from(["cndl", "win64"]).unwrap();
        assert!(app.client_setting().proxies.is_none());
        assert_eq!(app.client_setting().timeout, Duration::from_secs(30));
    }
}

use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("sitesift")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract CSS-selected content from lists of web pages")
        .arg(clap::arg!([URL] ... "Page URLs to process"))
        .arg(clap::arg!(--sitemap <URL> "Read page URLs from this sitemap"))
        .arg(
            clap::arg!(--csv <FILE> "Read page URLs from the \"URL\" column of a CSV file")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--urls <FILE> "Read page URLs, one per line, from a file or '-' for stdin"))
        .arg(clap::arg!(-s --selector <CSS> "CSS selector applied to every page"))
        .arg(clap::arg!(--"list-urls" "Print the resolved URLs and exit without fetching pages"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file, or '-' for stdout")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (csv, json)")
                .default_value("csv")
                .value_parser(["csv", "json"]),
        )
        .arg(clap::arg!(--concurrency <NUM> "Number of pages fetched at the same time").default_value("5"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("10"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests"))
        .arg(
            clap::arg!(--completions <SHELL> "Print a shell completion script and exit")
                .value_parser(["bash", "zsh", "fish", "powershell", "elvish"]),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "sitesift", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "sitesift", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "sitesift", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "sitesift", &completions_dir).unwrap();
}

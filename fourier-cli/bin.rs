fn main() {
    let config = match fourier_cli::Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = fourier_cli::run(config) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

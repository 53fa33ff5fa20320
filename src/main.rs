fn main() {
    if let Err(e) = mohid_cmd::run() {
        mohid_cmd::print_error(&e);
        std::process::exit(mohid_cmd::exit_code(&e));
    }
}

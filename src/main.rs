fn main() -> std::process::ExitCode {
    casegen_lib::app::run()
}

use std::process::ExitCode;

fn main() -> ExitCode {
    unit_converter_lib::run()
}

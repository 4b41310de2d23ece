use std::process::ExitCode;

fn main() -> ExitCode {
    loanwise_lib::run()
}

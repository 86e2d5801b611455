mod command;
mod post_hoc;
mod prompt;
mod report;
mod session;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}

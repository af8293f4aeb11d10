mod bot;
mod command;
mod store;
mod telemetry;
mod util;

fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    command::run()
}

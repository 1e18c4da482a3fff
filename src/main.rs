use driftfield::Simulation;

fn main() {
    env_logger::init();

    if let Err(error) = Simulation::new().run() {
        eprintln!("driftfield: {}", error);
        std::process::exit(1);
    }
}

//! Showroom binary: the stock dioramas behind the scene-switcher

fn main() {
    env_logger::init();
    showroom::default().run();
}

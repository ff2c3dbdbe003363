use insanity::app::App;
use insanity::config::AppConfig;
use insanity::logging::{init_logging, LoggingConfig};
use winit::event_loop::EventLoop;

fn main() {
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new();
    let mut app = App::new(AppConfig::default());

    if let Err(e) = app.init(&event_loop) {
        log::error!("{}", e);
        app.shutdown();
        std::process::exit(e.exit_code());
    }

    app.run(event_loop)
}

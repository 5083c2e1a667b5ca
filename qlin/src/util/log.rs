use log::LevelFilter;

pub fn level_filter(verbosity: u8) -> LevelFilter { 
    match verbosity {
        0 => LevelFilter::Off,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs a terminal logger writing to stderr, 
/// leaving stdout to the program's own output.
pub fn init_logger(verbosity: u8) -> Result<(), log::SetLoggerError> { 
    use simplelog::*;

    let mut cb = ConfigBuilder::new();
    cb.set_location_level(LevelFilter::Off);
    cb.set_target_level(LevelFilter::Off);
    cb.set_thread_level(LevelFilter::Off);
    cb.set_level_color(Level::Trace, Some(Color::Green));
    let config = cb.build();

    TermLogger::init(
        level_filter(verbosity),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto
    )
}

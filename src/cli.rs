extern crate clap;
use clap::{ App, Arg };

pub fn build_cli() -> App<'static, 'static> {
    let value = |name: &'static str, help: &'static str| {
        Arg::with_name(name)
            .long(name)
            .required(false)
            .takes_value(true)
            .help(help)
    };

    App::new("rocketsim")
        .version("1.0")
        .about("Rocket landing simulation in the terminal")
        .arg(value("timewarp", "simulation seconds per real second").short("w"))
        .arg(value("kp", "autopilot proportional gain"))
        .arg(value("ki", "autopilot integral gain"))
        .arg(value("kd", "autopilot derivative gain"))
        .arg(value("integrator", "fixed step integration scheme").possible_values(&["average", "verlet"]))
        .arg(Arg::with_name("square-cells")
            .long("square-cells")
            .help("don't double horizontal positions to make up for tall character cells"))
        .arg(value("poll-ms", "longest wait for a keypress each frame, in milliseconds"))
        .arg(value("seed", "random seed for flame flicker and crash debris").short("s"))
        .arg(value("mass", "rocket mass in kg").short("m"))
        .arg(value("spawn", "launch position as x,y"))
        .arg(value("target-altitude", "altitude the autopilot holds").short("a"))
        .arg(value("fragment-lifetime", "seconds crash debris lingers once grounded"))
        .arg(value("smoothing", "autopilot error smoothing interval in seconds"))
        .arg(Arg::with_name("manual")
            .long("manual")
            .help("launch rockets without an autopilot; digits set thrust"))
        .arg(value("log-level", "trace, debug, info, warn or error").short("l"))
        .arg(value("log-file", "write logs here instead of stderr"))
}

pub fn parse_command_line() -> clap::ArgMatches<'static> {
    build_cli().get_matches()
}

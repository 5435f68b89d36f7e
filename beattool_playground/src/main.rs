use beattool::{InputFrame, Mode, ModeSelector, OUT_HIGH, RAW_MAX};
use oorandom::Rand32;

/// Control loop period, in microseconds (10kHz)
const CYCLE_US: u32 = 100;
/// Peak ADC noise added to every knob reading
const ADC_NOISE: u16 = 3;

struct Args {
    mode: Mode,
    rate: u16,
    range: u16,
    gate_period: u32,
    duration: u32,
}

fn usage() -> ! {
    log::error!("Usage: playground <divide|multiply|burst|clock> <rate 0-1023> <range 0-1023> [gate period us] [duration us]");
    std::process::exit(1)
}

fn parse_knob(arg: Option<String>) -> Option<u16> {
    arg?.parse::<u16>().ok().filter(|x| *x <= RAW_MAX)
}

fn parse_args() -> Option<Args> {
    let mut args = std::env::args().skip(1);
    let mode_name = args.next()?;
    let mode = *Mode::modes()
        .iter()
        .find(|m| m.to_str().eq_ignore_ascii_case(&mode_name))?;
    let rate = parse_knob(args.next())?;
    let range = parse_knob(args.next())?;
    let gate_period = match args.next() {
        Some(x) => x.parse().ok()?,
        None => 500_000,
    };
    let duration = match args.next() {
        Some(x) => x.parse().ok()?,
        None => 5_000_000,
    };
    Some(Args {
        mode,
        rate,
        range,
        gate_period,
        duration,
    })
}

/// The centre of the mode knob's bucket for `mode`
fn mode_knob_position(mode: Mode) -> u16 {
    let step = (RAW_MAX + 1) / Mode::modes().len() as u16;
    mode as u16 * step + step / 2
}

fn noisy(rng: &mut Rand32, value: u16) -> u16 {
    let offset = rng.rand_range(0..(2 * ADC_NOISE as u32 + 1)) as u16;
    (value + offset).saturating_sub(ADC_NOISE).min(RAW_MAX)
}

fn main() {
    colog::init();
    let Some(args) = parse_args() else {
        usage();
    };
    log::info!(
        "Running {} mode for {}us: rate={}, range={}, gate period={}us",
        args.mode.to_str(),
        args.duration,
        args.rate,
        args.range,
        args.gate_period
    );

    let mut tool = ModeSelector::default();
    let mut rng = Rand32::new(0x6265_6174);
    let mode_raw = mode_knob_position(args.mode);
    let mut prev = None;
    let mut last_edge = 0u32;
    for time in (0..args.duration).step_by(CYCLE_US as usize) {
        let gate = args.gate_period != 0 && time % args.gate_period < args.gate_period / 2;
        let frame = InputFrame::new(
            time,
            noisy(&mut rng, mode_raw),
            noisy(&mut rng, args.rate),
            noisy(&mut rng, args.range),
            gate,
        );
        let out = tool.next(&frame);
        if prev != Some(out) {
            let level = if out == OUT_HIGH { "HIGH" } else { "LOW" };
            log::info!("t={:>9}us  {:<4} (+{}us)", time, level, time - last_edge);
            last_edge = time;
            prev = Some(out);
        }
    }
}

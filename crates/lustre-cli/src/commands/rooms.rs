//! Room table.

use clap::Args;
use lustre_config::Room;
use lustre_engine::RoomAcoustics;

#[derive(Args)]
pub struct RoomsArgs {
    /// Sample rate used for impulse lengths
    #[arg(long, default_value = "48000")]
    sample_rate: u32,
}

pub fn run(args: RoomsArgs) -> anyhow::Result<()> {
    let sample_rate = args.sample_rate as f32;

    println!("Rooms (impulse lengths at {} Hz):", args.sample_rate);
    println!(
        "  {:10} {:>9} {:>8} {:>6} {:>10}",
        "name", "length s", "density", "wet", "frames"
    );
    for &room in Room::ALL {
        let acoustics = RoomAcoustics::of(room);
        println!(
            "  {:10} {:>9.2} {:>8.1} {:>6.2} {:>10}",
            room.as_str(),
            acoustics.reverb_time,
            acoustics.density,
            acoustics.wet,
            acoustics.frames(sample_rate)
        );
    }
    Ok(())
}

use ffnet::dataset::Preset;
use ffnet::net::observer::EpochStats;
use ffnet::scoring::{MulticlassScorer, RoundedScorer};
use ffnet_demos::{decision_map, init_logging};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

const SEED: u64 = 0xf1234567;

pub fn main() -> ffnet::Result<()> {
    init_logging();

    let preset = match std::env::args().nth(1) {
        Some(name) => name.parse::<Preset>()?,
        None => Preset::CircleInCircle,
    };
    let mut rng = StdRng::seed_from_u64(SEED);
    let dataset = preset.dataset(&mut rng);
    let mut net = preset.builder().with_seed(SEED).build()?;
    info!("Preset {preset}, {} items\n{}", dataset.len(), net.summary());

    let report_every = (net.config().epochs / 10).max(1);
    let start = Instant::now();
    let cost = net.train_with(&dataset, &mut |stats: &EpochStats| {
        if stats.epoch % report_every == 0 {
            info!(
                "epoch {:>5}: cost {:.5}, accuracy {:.1}%",
                stats.epoch,
                stats.cost,
                stats.accuracy * 100.0
            );
        }
    })?;
    println!(
        "Trained {} epochs in {:.2} sec, final cost {cost:.5}",
        net.config().epochs,
        start.elapsed().as_secs_f32()
    );

    let mut rounded = RoundedScorer::default();
    net.evaluate(&dataset, &mut rounded)?;
    println!("Rounded accuracy: {:.1}%", rounded.accuracy() * 100.0);

    let mut scorer = MulticlassScorer::for_net(&net);
    net.evaluate(&dataset, &mut scorer)?;
    scorer.print_report();

    println!("{}", decision_map(&mut net, preset, 40, 20)?);
    Ok(())
}

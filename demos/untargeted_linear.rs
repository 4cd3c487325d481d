//! Untargeted attack on a two-class linear classifier over the unit square.
//!
//! `cargo run --example untargeted_linear`
use boundary_attack::util::l2_distance;
use boundary_attack::{AttackParams, BoundaryAttack, Classifier, ExampleOutcome, Sequential};
use log::{info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use ndarray::{array, Axis};
use std::error::Error;

fn init_logging() -> Result<(), Box<dyn Error>> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {l} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;

    // Class 1 wherever x0 + x1 > 0.25
    let clf = Sequential::linear(array![[-1., -1.], [1., 1.]], array![0.25, -0.25], (0., 1.));
    info!("classifier: {} ({:?} classes)", clf, clf.num_classes());

    let attack = BoundaryAttack::with_params(
        &clf,
        &AttackParams::default()
            .targeted(false)
            .init_size(50)
            .max_iter(200),
    )?
    .with_seed(7);

    let x = array![[0.1, 0.1], [0.02, 0.05], [0.7, 0.6]].into_dyn();
    let report = attack.generate_report(x.view(), None)?;
    let preds = clf.predict_labels(x.view())?;
    let preds_adv = clf.predict_labels(report.adversarial.view())?;

    for (i, outcome) in report.outcomes.iter().enumerate() {
        let original = x.index_axis(Axis(0), i);
        let adversarial = report.adversarial.index_axis(Axis(0), i);
        match outcome {
            ExampleOutcome::Refined => info!(
                "example {}: {} -> {} (class {} -> {}), L2 distance {:.4}",
                i,
                original,
                adversarial,
                preds[i],
                preds_adv[i],
                l2_distance(&original, &adversarial)
            ),
            other => info!("example {}: left unchanged ({:?})", i, other),
        }
    }
    info!("success rate {:.2}", report.success_rate);
    Ok(())
}

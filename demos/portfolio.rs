use log::info;
use std::time::Duration;
use vitrine::prelude::*;

/// Plays back a scripted visit to a one-page portfolio, with no browser involved:
///
/// 1. A [`TypingCycler`] cycles through the job titles in the hero section.
/// 2. A [`VisibilityGate`] watches the "about" section of a [`VirtualViewport`], and the visitor
///    scrolls down to it after a few seconds.
/// 3. Once the section is revealed, three [`CounterRamp`]s count up to their statistics.
///
/// Everything is driven by a [`VirtualScheduler`], so the output is identical on every run. Run
/// with `RUST_LOG=info` to see the headline and counters, or `RUST_LOG=trace` to see every timer
/// and frame as it fires.

fn main() {
    env_logger::init();

    let mut scheduler = VirtualScheduler::new();
    let mut viewport = VirtualViewport::new(1280.0, 720.0);
    viewport.set_region("about", Rect::new(0.0, 1400.0, 1280.0, 600.0));

    let mut headline = TypingCycler::new(
        ["Full-Stack Developer", "Frontend Specialist", "Backend Engineer"],
        TypingConfig::default(),
    )
    .expect("default typing config is valid");
    headline.subscribe(|text| info!("headline: {text:?}"));

    let mut about = VisibilityGate::new(VisibilityConfig::default())
        .expect("default visibility config is valid");
    about.subscribe(|_| info!("about section revealed"));

    let mut stats: Vec<CounterRamp> = [("projects", 50), ("years", 5), ("clients", 30)]
        .into_iter()
        .map(|(label, target)| {
            let mut ramp = CounterRamp::new(target, CounterConfig::default())
                .expect("default counter config is valid");
            ramp.subscribe(move |count| info!("{label}: {count}"));
            ramp
        })
        .collect();

    headline.start(&mut scheduler);
    about.bind("about", &mut viewport);

    // (time, scroll offset) pairs of the visitor's scroll script.
    let script = [(0, 0.0), (3000, 400.0), (4000, 800.0), (4500, 1100.0), (9000, 0.0)];
    for (at, scroll_y) in script {
        let at = Duration::from_millis(at);
        while let Some(fired) = scheduler.next_due(at) {
            headline.fire(fired.ticket, fired.at, &mut scheduler);
            for ramp in stats.iter_mut() {
                ramp.fire(fired.ticket, fired.at, &mut scheduler);
            }
        }
        info!("scrolled to {scroll_y} at {at:?}");
        viewport.scroll_to(0.0, scroll_y);
        for (subscription, entry) in viewport.entries() {
            about.notify(subscription, &entry, &mut viewport);
        }
        for ramp in stats.iter_mut() {
            ramp.set_gate(about.is_visible(), &mut scheduler);
        }
    }

    while let Some(fired) = scheduler.next_due(Duration::from_secs(12)) {
        headline.fire(fired.ticket, fired.at, &mut scheduler);
        for ramp in stats.iter_mut() {
            ramp.fire(fired.ticket, fired.at, &mut scheduler);
        }
    }

    headline.stop(&mut scheduler);
    about.unbind(&mut viewport);
    info!(
        "final: {:?}, headline {:?}",
        stats.iter().map(CounterRamp::count).collect::<Vec<_>>(),
        headline.display()
    );
}

use std::path::Path;

use console::Style;
use livespeckle_core::config::SpeckleConfig;
use livespeckle_core::pipeline::WorkerStats;
use livespeckle_core::visual::ArtifactKind;

use crate::commands::analyze::AnalyzeTotals;
use crate::commands::replay::ReplayTotals;
use crate::sink::PngSink;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    disabled: Style,
    warn: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            disabled: Style::new().dim().yellow(),
            warn: Style::new().yellow().bold(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_settings(title: &str, input: &Path, config: &SpeckleConfig, output: Option<&Path>) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    match output {
        Some(dir) => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.path.apply_to(dir.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.disabled.apply_to("not saved")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Processing"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Window"),
        s.value.apply_to(format!("{0}x{0} px", config.window_size))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Accumulate"),
        s.value.apply_to(format!("{} frames", config.accumulation_length))
    );
    if config.filter_size > 1 {
        println!(
            "    {:<14}{}",
            s.label.apply_to("High-pass"),
            s.value.apply_to(format!("{} px box", config.filter_size))
        );
    } else {
        println!(
            "    {:<14}{}",
            s.label.apply_to("High-pass"),
            s.disabled.apply_to("disabled")
        );
    }
    println!(
        "    {:<14}{}",
        s.label.apply_to("Resize"),
        s.value.apply_to(if config.resize_for_display { "2x" } else { "off" })
    );
    println!();
}

pub fn print_replay_result(totals: &ReplayTotals, stats: &WorkerStats, sink: &PngSink) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Replay"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Offered"),
        s.value.apply_to(totals.offered)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Processed"),
        s.value.apply_to(stats.frames_processed)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Dropped"),
        s.value.apply_to(totals.dropped)
    );
    if stats.frames_skipped > 0 {
        println!(
            "    {:<14}{}",
            s.label.apply_to("Skipped"),
            s.warn.apply_to(format!("{} (not Mono8)", stats.frames_skipped))
        );
    }
    println!(
        "    {:<14}{}",
        s.label.apply_to("Cycles"),
        s.value.apply_to(stats.cycles_completed)
    );
    print_failures(&s, stats.failures, sink);
    print_artifacts(&s, sink);
}

pub fn print_analyze_result(totals: &AnalyzeTotals, sink: &PngSink) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Analysis"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Processed"),
        s.value.apply_to(totals.frames)
    );
    if totals.skipped > 0 {
        println!(
            "    {:<14}{}",
            s.label.apply_to("Skipped"),
            s.warn.apply_to(format!("{} (not Mono8)", totals.skipped))
        );
    }
    println!(
        "    {:<14}{}",
        s.label.apply_to("Cycles"),
        s.value.apply_to(totals.cycles)
    );
    if totals.pending > 0 {
        println!(
            "    {:<14}{}",
            s.label.apply_to("Incomplete"),
            s.disabled
                .apply_to(format!("{} frames in an unfinished cycle", totals.pending))
        );
    }
    print_artifacts(&s, sink);
}

fn print_failures(s: &Styles, failures: u64, sink: &PngSink) {
    if failures == 0 {
        return;
    }
    println!(
        "    {:<14}{}",
        s.label.apply_to("Failures"),
        s.warn.apply_to(failures)
    );
    for message in sink.errors() {
        println!("      {}", s.disabled.apply_to(message));
    }
}

fn print_artifacts(s: &Styles, sink: &PngSink) {
    println!();
    println!("  {}", s.header.apply_to("Artifacts"));
    for kind in ArtifactKind::ALL {
        println!(
            "    {:<14}{}",
            s.label.apply_to(kind.slug()),
            s.value.apply_to(sink.count(kind))
        );
    }
    println!();
}

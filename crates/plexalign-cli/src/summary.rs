use console::Style;
use plexalign_core::pipeline::config::RegistrationConfig;
use plexalign_core::pipeline::{BatchPlan, RegistrationReport};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    warning: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            warning: Style::new().yellow().bold(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

pub fn print_registration_summary(config: &RegistrationConfig) {
    let s = Styles::new();
    print_title(&s, "Round Registration");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Reference"),
        s.value.apply_to(&config.naming.reference_marker)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Anchor"),
        s.method.apply_to(&config.anchor)
    );
    if config.roi.enabled {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Crop"),
            s.value.apply_to(format!(
                "{} (margin {} px)",
                config.roi.manifest, config.roi.margin
            ))
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Crop"),
            s.disabled.apply_to("disabled")
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Border"),
        s.method.apply_to(config.border)
    );
    if config.alignment.hann_window {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Window"),
            s.method.apply_to("Hann")
        );
    }
    if config.resources.check_memory {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Memory"),
            s.value.apply_to(format!(
                "up to {:.0}% of available",
                config.resources.memory_fraction * 100.0
            ))
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Memory"),
            s.disabled.apply_to("unchecked")
        );
    }
    println!();
}

pub fn print_plan(config: &RegistrationConfig, plan: &BatchPlan) {
    let s = Styles::new();
    print_title(&s, "Batch");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(plan.frame_count())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Canvas"),
        s.value.apply_to(plan.canvas)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Smallest"),
        s.value.apply_to(plan.smallest)
    );
    match plan.roi {
        Some(roi) => println!(
            "  {:<14}{}",
            s.label.apply_to("Crop"),
            s.value.apply_to(roi)
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Crop"),
            s.disabled.apply_to("none")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Rounds"));
    for round in &plan.grouping.rounds {
        let markers: Vec<&str> = round.markers.iter().map(|f| f.name.marker.as_str()).collect();
        println!(
            "    {:<12}{} + [{}]",
            s.label.apply_to(format!("round {}", round.id)),
            s.method.apply_to(&round.reference.name.marker),
            markers.join(", ")
        );
    }
    for rejected in &plan.grouping.rejected {
        println!(
            "    {:<12}{}",
            s.label.apply_to(format!("round {}", rejected.id)),
            s.warning.apply_to(format!(
                "excluded: {} reference frames",
                rejected.reference_count
            ))
        );
    }
    println!();

    print_malformed(&s, plan.malformed.iter().map(|m| (&m.path, &m.reason)));
}

pub fn print_report(report: &RegistrationReport) {
    let s = Styles::new();
    print_title(&s, "Registration Result");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Anchor"),
        s.value.apply_to(format!("round {}", report.anchor))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Canvas"),
        s.value.apply_to(report.canvas)
    );
    if report.downsample_factor > 1 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Downsample"),
            s.value.apply_to(format!("x{}", report.downsample_factor))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Translations"));
    for record in &report.records {
        println!(
            "    {:<12}{}  {}",
            s.label.apply_to(format!("round {}", record.round)),
            s.value.apply_to(record.estimate.translation),
            s.label
                .apply_to(format!("error {:.4}", record.estimate.error))
        );
    }
    for (round, count) in &report.skipped_rounds {
        println!(
            "    {:<12}{}",
            s.label.apply_to(format!("round {round}")),
            s.warning
                .apply_to(format!("written untranslated ({count} reference frames)"))
        );
    }
    println!();

    print_malformed(&s, report.malformed.iter().map(|m| (&m.path, &m.reason)));

    println!(
        "  {} frames written to {}",
        report.written.len(),
        s.path.apply_to(
            report
                .log_path
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )
    );
    println!(
        "  Log saved to {}",
        s.path.apply_to(report.log_path.display())
    );
}

fn print_malformed<'a>(
    s: &Styles,
    files: impl Iterator<Item = (&'a std::path::PathBuf, &'a String)>,
) {
    let files: Vec<_> = files.collect();
    if files.is_empty() {
        return;
    }
    println!("  {}", s.header.apply_to("Skipped files"));
    for (path, reason) in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!(
            "    {}  {}",
            s.warning.apply_to(name),
            s.label.apply_to(reason)
        );
    }
    println!();
}

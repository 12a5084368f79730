use std::path::Path;

use console::Style;
use macrostack_core::pipeline::config::StackConfig;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_stack_summary(config: &StackConfig, inputs: usize, output: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Focus Stack"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(11)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Inputs"),
        s.value.apply_to(format!("{inputs} images"))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Algorithm"),
        s.method.apply_to(config.algorithm)
    );
    if config.auto_align {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Alignment"),
            s.method.apply_to("auto")
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Alignment"),
            s.disabled.apply_to("disabled")
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Threads"),
        s.value.apply_to(config.threads)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Format"),
        s.value.apply_to(config.output_format)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!();
}

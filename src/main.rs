use anyhow::Context;
use clap::Parser;
use std::path::Path;

mod changelog;
mod error;
mod render;
mod spec;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "rpm-specgen")]
#[command(about = "Render a YAML package description into an RPM spec file", long_about = None)]
struct Cli {
    /// Path to the YAML package description.
    file: String,

    /// Tag appended to Release (pass an empty string to disable suffixing).
    #[arg(long, default_value = "%{?dist}")]
    dist_tag: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Parse + validate the package description. Any missing field or
    //    unsupported language aborts here, before anything is written.
    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("read package description {}", cli.file))?;
    let validated = spec::PackageSpec::parse(&text)?.validate_and_build()?;

    // 2) Gather changelog entries when asked for.
    let entries = if validated.changelog_from_git {
        changelog::collect(Path::new(&cli.file), &validated)
    } else {
        Vec::new()
    };

    // 3) Render and write <name_expanded>.spec.
    let opts = render::RenderOptions {
        dist_tag: cli.dist_tag,
    };
    let rendered = render::render(&validated, &opts, &entries);

    let out_path = format!("{}.spec", validated.name_expanded);
    rendered.write(Path::new(&out_path))?;
    println!("Wrote {}", out_path);

    Ok(())
}

use std::path::{Path, PathBuf};

use clap::Parser;
use ordered_float::NotNan;
use rivers::{Contour, Point, River, RiverCfg, RiverPoints};
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

type Float = NotNan<f64>;

#[derive(Parser)]
struct Args {
    /// A river file: `north`, `south`, and `island` sections of "x y" lines.
    input: PathBuf,

    /// How many evenly spaced widths to print.
    #[arg(long, default_value_t = 11)]
    samples: usize,

    /// Tolerance for comparing x coordinates.
    #[arg(long)]
    eps: Option<f64>,

    /// Draw the river and its width profile to this SVG file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Dump the width profile as JSON instead of printing samples.
    #[arg(long)]
    json: bool,
}

fn f(x: f64) -> anyhow::Result<Float> {
    Ok(NotNan::new(x)?)
}

fn polyline(points: &[Point<Float>], close: bool) -> svg::node::element::path::Data {
    let mut data = svg::node::element::path::Data::new();
    for (i, p) in points.iter().enumerate() {
        let p = (p.x.into_inner(), p.y.into_inner());
        data = if i == 0 {
            data.move_to(p)
        } else {
            data.line_to(p)
        };
    }
    if close {
        data = data.close();
    }
    data
}

fn draw(river: &River<Float>, output: &Path) -> anyhow::Result<()> {
    let all_points = river
        .north()
        .points()
        .iter()
        .chain(river.south().points())
        .chain(river.islands().iter().flat_map(|island| island.points()));
    let ys: Vec<_> = all_points.map(|p| p.y.into_inner()).collect();
    let min_x = river.north().first().x.into_inner();
    let max_x = river.north().last().x.into_inner();
    let min_y = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let max_y = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = 1.0;
    let stroke_width = (max_y - min_y).max(max_x - min_x) / 512.0;

    // The profile goes underneath the river, with the same horizontal scale.
    let profile = river.profile();
    let max_width = profile
        .breakpoints()
        .iter()
        .map(|b| b.width.into_inner())
        .chain([river.start_width().into_inner(), river.end_width().into_inner()])
        .fold(0.0, f64::max);
    let plot_top = min_y - pad - max_width;

    // SVG's y axis points down, so flip everything.
    let mut document = svg::Document::new()
        .set(
            "viewBox",
            (
                min_x - pad,
                -(max_y + pad),
                max_x - min_x + 2.0 * pad,
                max_y - plot_top + 2.0 * pad,
            ),
        )
        .set("transform", "scale(1, -1)");

    for shore in [river.north(), river.south()] {
        let path = svg::node::element::Path::new()
            .set("stroke", "blue")
            .set("fill", "none")
            .set("stroke-width", stroke_width)
            .set("d", polyline(shore.points(), false));
        document = document.add(path);
    }
    for island in river.islands() {
        let path = svg::node::element::Path::new()
            .set("stroke", "black")
            .set("fill", "green")
            .set("fill-opacity", "0.3")
            .set("stroke-width", stroke_width)
            .set("d", polyline(island.points(), true));
        document = document.add(path);
    }

    let mut graph = vec![Point::new(river.north().first().x, river.start_width())];
    graph.extend(
        river
            .sorted_events()
            .iter()
            .map(|ev| Point::new(ev.x, river.width_at_x(&ev.x))),
    );
    graph.push(Point::new(river.north().last().x, river.end_width()));
    let shift = f(plot_top)?;
    let graph: Vec<_> = graph
        .into_iter()
        .map(|p| Point::new(p.x, p.y + shift))
        .collect();
    let path = svg::node::element::Path::new()
        .set("stroke", "red")
        .set("fill", "none")
        .set("stroke-width", stroke_width)
        .set("d", polyline(&graph, false));
    document = document.add(path);

    for ev in river.sorted_events() {
        let data = svg::node::element::path::Data::new()
            .move_to((ev.x.into_inner(), plot_top))
            .line_to((ev.x.into_inner(), max_y));
        let path = svg::node::element::Path::new()
            .set("stroke", "black")
            .set("stroke-width", stroke_width / 4.0)
            .set("stroke-opacity", "0.2")
            .set("d", data);
        document = document.add(path);
    }

    svg::save(output, &document)?;
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let cfg = match args.eps {
        Some(eps) => RiverCfg::with_eps(f(eps)?),
        None => RiverCfg::default(),
    };
    let river = RiverPoints::<Float>::from_path(&args.input)?.into_river(cfg)?;
    tracing::info!(
        input = %args.input.display(),
        islands = river.islands().len(),
        events = river.num_events(),
        "loaded river"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&river.profile())?);
    } else {
        let profile = river.profile();
        let steps = args.samples.max(2) - 1;
        for i in 0..=steps {
            let t = f(i as f64 / steps as f64)?;
            println!(
                "t = {:.3}, x = {:.3}: width {:.6}",
                t,
                river.x_at(&t),
                profile.width(&t)
            );
        }
        println!("minimum width: {:.6}", river.min_width());
    }

    if let Some(output) = &args.output {
        draw(&river, output)?;
    }

    Ok(())
}

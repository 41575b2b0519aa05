//! Form Layout Demo
//!
//! Builds an address form from nested Stack, Row and Center layouts, lays it
//! out at two window sizes and prints what each pass decided.
//!
//! ```bash
//! RUST_LOG=layerfit=debug cargo run -p layerfit --example form_demo
//! ```

use layerfit::prelude::*;

const INF: u32 = Dimension::UNBOUNDED_LENGTH;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Layerfit Form Demo");
    println!("==================\n");

    let mut tree = BoxTree::new();
    let window = tree.insert(BoxNode::leaf().with_size(Dimension::new(480, 320)));
    tree.set_layout(window, LayoutInstance::center(window))?;

    let form = tree.insert(
        BoxNode::leaf()
            .with_insets(Insets::all(8))
            .with_min(Dimension::new(200, 120)),
    );
    tree.set_layout(form, LayoutInstance::stack(form, 6))?;
    tree.add_child(window, form)?;

    for _ in 0..3 {
        let field = tree.insert(
            BoxNode::leaf()
                .with_min(Dimension::new(160, 24))
                .with_max(Dimension::new(400, 32)),
        );
        tree.add_child(form, field)?;
    }

    let notes = tree.insert(
        BoxNode::leaf()
            .with_min(Dimension::new(160, 48))
            .with_max(Dimension::new(INF, INF)),
    );
    tree.add_child(form, notes)?;

    let buttons = tree.insert(BoxNode::leaf());
    tree.set_layout(buttons, LayoutInstance::row(buttons, 8))?;
    tree.add_child(form, buttons)?;
    for _ in 0..2 {
        let button = tree.insert(
            BoxNode::leaf()
                .with_min(Dimension::new(60, 28))
                .with_max(Dimension::new(120, 28)),
        );
        tree.add_child(buttons, button)?;
    }

    println!(
        "form minimum: {}",
        tree.minimum_layout_size(form)?.unwrap_or_default()
    );
    println!(
        "form maximum: {}\n",
        tree.maximum_layout_size(form)?.unwrap_or_default()
    );

    for size in [Dimension::new(480, 320), Dimension::new(220, 180)] {
        tree.set_size(window, size)?;
        let mut sink = FirstIssueSink::new(RecordingSink::<1>::new());
        let laid_out = tree.layout_tree(window, &mut sink)?;

        println!("window {size}: {laid_out} containers laid out");
        for container in [window, form, buttons] {
            print!("{}", tree.report(container)?);
        }
        match sink.inner().iter().next() {
            Some(first) => println!("first issue: {first}\n"),
            None => println!("no issues\n"),
        };
    }

    Ok(())
}

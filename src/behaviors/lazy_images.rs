use std::rc::Rc;

use crate::{BehaviorConfig, NodeId, ObserverId, Page, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyLoadMode {
    /// Images load when they first intersect the viewport.
    Observed(ObserverId),
    /// No intersection observer: every image was loaded at bind time.
    Eager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LazyImageBinding {
    pub mode: LazyLoadMode,
    pub images: usize,
}

/// Registers every lazy image with one shared intersection observer, or
/// loads them all at once when the environment has none.
pub fn bind(page: &mut Page, config: &BehaviorConfig) -> Result<LazyImageBinding> {
    let images = page.query_selector_all(&config.lazy_image_selector)?;
    let config = Rc::new(config.clone());

    let callback_config = Rc::clone(&config);
    let observer = page.create_intersection_observer(move |page, entries, observer| {
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            load_image(page, entry.target, &callback_config)?;
            page.unobserve(observer, entry.target)?;
        }
        Ok(())
    });

    let mode = match observer {
        Some(observer) => {
            for image in &images {
                page.observe(observer, *image)?;
            }
            LazyLoadMode::Observed(observer)
        }
        None => {
            for image in &images {
                load_image(page, *image, &config)?;
            }
            LazyLoadMode::Eager
        }
    };

    Ok(LazyImageBinding {
        mode,
        images: images.len(),
    })
}

/// Copies the deferred source into `src` and drops the lazy marker.
pub fn load_image(page: &mut Page, image: NodeId, config: &BehaviorConfig) -> Result<()> {
    let source = page
        .dataset(image, &config.deferred_source_key)?
        .unwrap_or_default();
    page.set_attribute(image, "src", &source)?;
    page.remove_class(image, &config.lazy_class)?;
    page.trace_behavior_line(format!(
        "[behavior] lazy image {} loaded src={source}",
        page.trace_node_label(image)
    ));
    Ok(())
}

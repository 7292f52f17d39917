use super::*;
use crate::behaviors::{LazyImageBinding, LazyLoadMode};

const GALLERY: &str = r#"
<main>
  <img id="hero" class="lazy" data-src="hero.jpg" alt="Hero">
  <img id="below" class="lazy rounded" data-src="below.jpg" alt="Below">
  <img id="plain" src="logo.png" alt="Logo">
</main>
"#;

fn gallery_with_layout(options: PlatformOptions) -> Result<Page> {
    let mut page = Page::with_options(GALLERY, options)?;
    page.set_layout_box("#hero", LayoutBox::new(0, 300)?)?;
    page.set_layout_box("#below", LayoutBox::new(2_000, 300)?)?;
    page.set_layout_box("#plain", LayoutBox::new(100, 50)?)?;
    Ok(page)
}

#[test]
fn without_observer_every_lazy_image_loads_at_once() -> Result<()> {
    let mut page = Page::with_options(
        r#"<img id="photo" class="lazy" data-src="photo.jpg">"#,
        PlatformOptions::default().without_intersection_observer(),
    )?;
    page.complete_loading()?;
    let binding = behaviors::lazy_images::bind(&mut page, &BehaviorConfig::default())?;

    assert_eq!(
        binding,
        LazyImageBinding {
            mode: LazyLoadMode::Eager,
            images: 1,
        }
    );
    page.assert_attribute("#photo", "src", Some("photo.jpg"))?;
    page.assert_class("#photo", "lazy", false)?;
    Ok(())
}

#[test]
fn eager_fallback_ignores_the_viewport() -> Result<()> {
    let mut page =
        gallery_with_layout(PlatformOptions::default().without_intersection_observer())?;
    behaviors::install(&mut page, &BehaviorConfig::default())?;
    page.complete_loading()?;

    page.assert_attribute("#hero", "src", Some("hero.jpg"))?;
    page.assert_attribute("#below", "src", Some("below.jpg"))?;
    page.assert_attribute("#plain", "src", Some("logo.png"))?;
    let below = page.get_element_by_id("below").expect("image exists");
    assert_eq!(page.class_list(below)?, vec!["rounded"]);
    Ok(())
}

#[test]
fn observed_images_load_when_they_enter_the_viewport() -> Result<()> {
    let mut page = gallery_with_layout(PlatformOptions::default())?;
    behaviors::install(&mut page, &BehaviorConfig::default())?;
    page.complete_loading()?;

    page.assert_attribute("#hero", "src", Some("hero.jpg"))?;
    page.assert_class("#hero", "lazy", false)?;
    page.assert_attribute("#below", "src", None)?;
    page.assert_class("#below", "lazy", true)?;

    page.scroll_to(1_500)?;
    page.assert_attribute("#below", "src", Some("below.jpg"))?;
    page.assert_class("#below", "lazy", false)?;
    page.assert_class("#below", "rounded", true)?;
    Ok(())
}

#[test]
fn loaded_images_are_unobserved_and_never_reloaded() -> Result<()> {
    let mut page = gallery_with_layout(PlatformOptions::default())?;
    page.complete_loading()?;
    let binding = behaviors::lazy_images::bind(&mut page, &BehaviorConfig::default())?;
    let LazyLoadMode::Observed(observer) = binding.mode else {
        panic!("observer capability is on by default");
    };
    assert_eq!(binding.images, 2);

    // Bound after loading finished: nothing is delivered until the next flush.
    page.assert_attribute("#hero", "src", None)?;
    page.flush()?;
    page.assert_attribute("#hero", "src", Some("hero.jpg"))?;

    let hero = page.get_element_by_id("hero").expect("image exists");
    let below = page.get_element_by_id("below").expect("image exists");
    assert_eq!(page.observed_targets(observer), vec![below]);

    // A later change to the deferred source is not picked up again.
    page.set_attribute(hero, "data-src", "other.jpg")?;
    page.scroll_to(5_000)?;
    page.scroll_to(0)?;
    page.assert_attribute("#hero", "src", Some("hero.jpg"))?;
    Ok(())
}

#[test]
fn images_out_of_view_or_without_layout_stay_deferred() -> Result<()> {
    let mut page = Page::from_html(
        r#"<img id="far" class="lazy" data-src="far.jpg"><img id="ghost" class="lazy" data-src="ghost.jpg">"#,
    )?;
    page.set_layout_box("#far", LayoutBox::new(10_000, 100)?)?;
    behaviors::install(&mut page, &BehaviorConfig::default())?;
    page.complete_loading()?;
    page.scroll_to(600)?;

    page.assert_attribute("#far", "src", None)?;
    page.assert_class("#far", "lazy", true)?;
    page.assert_attribute("#ghost", "src", None)?;
    page.assert_class("#ghost", "lazy", true)?;
    Ok(())
}

#[test]
fn missing_deferred_source_loads_an_empty_src() -> Result<()> {
    let mut page = Page::with_options(
        r#"<img id="nosrc" class="lazy">"#,
        PlatformOptions::default().without_intersection_observer(),
    )?;
    behaviors::install(&mut page, &BehaviorConfig::default())?;
    page.complete_loading()?;
    page.assert_attribute("#nosrc", "src", Some(""))?;
    page.assert_class("#nosrc", "lazy", false)?;
    Ok(())
}

#[test]
fn images_without_the_lazy_class_are_left_alone() -> Result<()> {
    let mut page = Page::with_options(
        r#"<img id="eager" data-src="x.jpg"><div class="lazy" id="box" data-src="y.jpg"></div>"#,
        PlatformOptions::default().without_intersection_observer(),
    )?;
    page.complete_loading()?;
    let binding = behaviors::lazy_images::bind(&mut page, &BehaviorConfig::default())?;
    assert_eq!(binding.images, 0);
    page.assert_attribute("#eager", "src", None)?;
    page.assert_attribute("#box", "src", None)?;
    Ok(())
}

#[test]
fn load_image_uses_configured_marker_and_key() -> Result<()> {
    let mut page = Page::from_html(
        r#"<img id="pic" class="deferred" data-original="big.png">"#,
    )?;
    let mut config = BehaviorConfig::default().with_lazy_images("img.deferred", "deferred");
    config.deferred_source_key = "original".into();
    let pic = page.get_element_by_id("pic").expect("image exists");

    behaviors::lazy_images::load_image(&mut page, pic, &config)?;
    page.assert_attribute("#pic", "src", Some("big.png"))?;
    page.assert_class("#pic", "deferred", false)?;
    Ok(())
}

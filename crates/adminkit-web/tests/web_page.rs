#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use core::time::Duration;
use std::rc::Rc;

use adminkit_core::{EnhanceConfig, Enhancer, KeyInput, Listen, Page};
use adminkit_web::WebPage;
use adminkit_web::web_page::{Dispatch, HostEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

fn quiet() -> Dispatch {
    Rc::new(|_: HostEvent| {})
}

fn page_with(markup: &str) -> WebPage {
    let page = WebPage::new(quiet()).unwrap();
    page.document().body().unwrap().set_inner_html(markup);
    page
}

fn by_id(page: &WebPage, id: &str) -> Element {
    page.element_by_id(id).unwrap()
}

#[wasm_bindgen_test]
fn queries_follow_document_order() {
    let page = page_with(
        r##"<ul class="nav-sidebar">
             <li class="nav-item" id="group">
               <a class="nav-link" id="group-link" href="#">Group</a>
               <ul class="nav-treeview"><li class="nav-item"><a class="nav-link" id="leaf" href="/admin/articles/">A</a></li></ul>
             </li>
           </ul>"##,
    );
    let links = page.query_all(".nav-sidebar .nav-link");
    assert_eq!(links.len(), 2);
    assert_eq!(links[1], by_id(&page, "leaf"));

    let leaf = by_id(&page, "leaf");
    let group = page
        .closest(&leaf, ".nav-treeview")
        .and_then(|menu| page.closest(&menu, ".nav-item"))
        .unwrap();
    assert_eq!(group, by_id(&page, "group"));
    assert_eq!(
        page.child_matching(&group, ".nav-link"),
        Some(by_id(&page, "group-link"))
    );
    assert_eq!(page.query("#missing"), None);
}

#[wasm_bindgen_test]
fn styles_and_classes_round_trip() {
    let mut page = page_with(r#"<div id="panel"></div>"#);
    let panel = by_id(&page, "panel");

    page.set_style(&panel, "display", "none");
    assert_eq!(page.style(&panel, "display"), "none");
    page.set_style(&panel, "display", "");
    assert_eq!(page.style(&panel, "display"), "");

    page.add_class(&panel, "menu-open");
    page.add_class(&panel, "menu-open");
    assert!(page.has_class(&panel, "menu-open"));
    assert_eq!(panel.class_name(), "menu-open");
    page.remove_class(&panel, "menu-open");
    assert!(!page.has_class(&panel, "menu-open"));
}

#[wasm_bindgen_test]
fn link_targets_are_absolute() {
    let page = page_with(r#"<a id="add" href="/admin/articles/article/add/">Add</a>"#);
    let target = page.link_target(&by_id(&page, "add")).unwrap();
    assert!(target.starts_with("http"), "{target}");
    assert!(target.ends_with("/admin/articles/article/add/"), "{target}");
}

#[wasm_bindgen_test]
fn listen_attaches_dom_listeners() {
    let mut page = page_with(r#"<form id="f"></form>"#);
    let form = by_id(&page, "f");
    page.listen(Listen::KeyDown);
    page.listen(Listen::Resize);
    page.listen(Listen::Submit(form));
    assert_eq!(page.listener_count(), 3);
}

#[wasm_bindgen_test]
fn slash_focuses_search_in_live_document() {
    let page = page_with(
        r#"<div id="changelist-search"><input type="text" id="searchbar" value="draft"></div>"#,
    );
    let mut enhancer = Enhancer::new(page, EnhanceConfig::default());
    enhancer.start(Duration::ZERO);

    let outcome = enhancer.on_keydown(&KeyInput::new("/"));
    assert!(outcome.prevent_default);

    let page = enhancer.page();
    assert_eq!(page.active_tag().as_deref(), Some("INPUT"));
    let input: HtmlInputElement = by_id(page, "searchbar").dyn_into().unwrap();
    assert_eq!(input.selection_start().ok().flatten(), Some(0));
    assert_eq!(input.selection_end().ok().flatten(), Some(5));
    assert_eq!(
        page.attribute(&input, "placeholder").as_deref(),
        Some("Rechercher…  (/)")
    );
}

#[wasm_bindgen_test]
fn submit_flag_is_advisory() {
    let page = page_with(r#"<form id="f"><button type="submit">Save</button></form>"#);
    let mut enhancer = Enhancer::new(page, EnhanceConfig::default());
    enhancer.start(Duration::ZERO);
    let form = by_id(enhancer.page(), "f");

    assert!(enhancer.on_submit(&form, Duration::from_millis(10)));
    assert!(form.class_list().contains("is-submitting"));
    enhancer.advance(Duration::from_millis(8010));
    assert!(!form.class_list().contains("is-submitting"));
}

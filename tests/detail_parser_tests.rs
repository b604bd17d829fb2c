//! Detail page extraction across both product details layouts

use chrono::NaiveDate;
use kodegen_tools_bookmeta::{DetailPageError, SeriesInfo, parse_detail_page};

mod common;
use common::{BookFixture, detail_page, error_detail_page, test_config};

const URL: &str = "https://catalog.test/dp/B00TEST001";

#[test]
fn current_layout_yields_every_field() {
    let book = BookFixture::new("B00TEST001", "三体", &["刘慈欣"]).isbn("9787536692930");
    let html = detail_page(&book);
    let parsed = parse_detail_page(html.as_bytes(), URL, &test_config()).unwrap();
    let draft = parsed.draft;

    assert_eq!(draft.primary_id.as_deref(), Some("B00TEST001"));
    assert_eq!(draft.title.as_deref(), Some("三体"));
    assert_eq!(draft.authors, vec!["刘慈欣"]);
    assert_eq!(draft.rating, Some(4.5));
    assert_eq!(
        draft.series,
        Some(SeriesInfo {
            name: "Foundation".to_string(),
            index: 3.0
        })
    );
    assert_eq!(draft.tags, vec!["小说", "科幻小说", "SF; Classic"]);
    assert_eq!(draft.publisher.as_deref(), Some("重庆出版社"));
    assert_eq!(draft.published, NaiveDate::from_ymd_opt(2008, 1, 1));
    assert_eq!(draft.language.as_deref(), Some("zho"));
    assert_eq!(draft.isbn.as_deref(), Some("9787536692930"));

    let description = draft.description.unwrap();
    assert!(description.contains("<span>长篇</span>"));
    assert!(!description.contains("href"));

    assert_eq!(
        parsed.scanned_cover.as_deref(),
        Some("https://images-cn.ssl-images-amazon.com/images/I/51Pm4HoXK5L.jpg")
    );
    assert!(draft.cover_url.is_none());
}

#[test]
fn legacy_layout_is_read_from_label_tails() {
    let html = r#"<html><head><link rel="canonical" href="https://catalog.test/dp/B000LEGACY"></head><body>
        <div class="buying">
          <h1 class="parseasinTitle"><span id="btAsinTitle">基地 [平装] <span style="padding-left: 0">基地 (银河帝国1)</span></span></h1>
          <span><a href="/s?field-author=Asimov">艾萨克·阿西莫夫 (Isaac Asimov)</a> (作者), <span class="contributorNameTrigger">叶李华</span> (译者)</span>
          <div class="jumpBar"><span class="asinReviewsSummary"><img title="平均 4 星" src="s.gif"></span></div>
        </div>
        <table><tr><td class="bucket"><h2>基本信息</h2><div class="content"><ul>
          <li><b>出版社:</b> 江苏文艺出版社; 第1版 (2012年11月1日)</li>
          <li><b>语种：</b> 简体中文</li>
          <li><b>ISBN:</b> 7-5399-5125-7</li>
          <li><b>条形码:</b> 9787539951256</li>
        </ul></div></td></tr></table>
        </body></html>"#;
    let parsed = parse_detail_page(html.as_bytes(), URL, &test_config()).unwrap();
    let draft = parsed.draft;

    assert_eq!(draft.primary_id.as_deref(), Some("B000LEGACY"));
    assert_eq!(draft.title.as_deref(), Some("基地"));
    assert_eq!(draft.authors, vec!["艾萨克·阿西莫夫 (Isaac Asimov)", "叶李华"]);
    assert_eq!(draft.rating, Some(4.0));
    assert_eq!(draft.publisher.as_deref(), Some("江苏文艺出版社"));
    assert_eq!(draft.published, NaiveDate::from_ymd_opt(2012, 11, 1));
    assert_eq!(draft.language.as_deref(), Some("zho"));
    assert_eq!(draft.isbn.as_deref(), Some("7539951257"));
    assert!(draft.series.is_none());
    assert!(draft.tags.is_empty());
    assert!(parsed.scanned_cover.is_none());
}

#[test]
fn a_broken_field_does_not_stop_the_others() {
    let html = r#"<html><head><link rel="canonical" href="https://catalog.test/dp/B00BROKEN"></head><body>
        <h1 id="title"><span>Foundation</span></h1>
        <div id="byline"><span class="author"><a class="a-link-normal" href="/e/1">Isaac Asimov</a></span></div>
        <div data-feature-name="averageCustomerReviews"><i title="平均 12.5 星"></i></div>
        <div id="bookDetails_container_div"><div id="nonHeroSection"><table>
          <tr><td>出版社:</td><td>Gnome Press (sometime in the fifties)</td></tr>
          <tr><td>语种：</td><td>English</td></tr>
        </table></div></div>
        </body></html>"#;
    let draft = parse_detail_page(html.as_bytes(), URL, &test_config()).unwrap().draft;

    assert_eq!(draft.rating, None);
    assert_eq!(draft.published, None);
    assert_eq!(draft.publisher.as_deref(), Some("Gnome Press"));
    assert_eq!(draft.language.as_deref(), Some("eng"));
    assert_eq!(draft.title.as_deref(), Some("Foundation"));
    assert_eq!(draft.authors, vec!["Isaac Asimov"]);
    assert!(draft.missing_mandatory().is_empty());
}

#[test]
fn pages_without_mandatory_fields_still_parse() {
    let html = r#"<html><body><h1 id="title">Nameless</h1></body></html>"#;
    let draft = parse_detail_page(html.as_bytes(), URL, &test_config()).unwrap().draft;
    assert_eq!(draft.missing_mandatory(), vec!["authors", "primary identifier"]);
}

#[test]
fn error_pages_are_reported() {
    let err = parse_detail_page(error_detail_page().as_bytes(), URL, &test_config()).unwrap_err();
    assert!(matches!(err, DetailPageError::ErrorPage { ref message, .. } if message.contains("无法显示")));

    let not_found = "<html><head><title>404 - Document Not Found</title></head></html>";
    let err = parse_detail_page(not_found.as_bytes(), URL, &test_config()).unwrap_err();
    assert_eq!(err, DetailPageError::NotFound { url: URL.to_string() });
}

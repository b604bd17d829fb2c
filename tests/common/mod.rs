//! Test utilities and fixtures for the bookmeta test suite

use kodegen_tools_bookmeta::{CatalogConfig, FetchError, Fetcher};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Base URL every test configuration points at
#[allow(dead_code)]
pub const TEST_BASE_URL: &str = "https://catalog.test";

/// Image host every test configuration points at
#[allow(dead_code)]
pub const TEST_IMAGE_BASE_URL: &str = "https://images.test/P/";

/// Configuration aimed at the in-memory fetcher with fast worker timing
#[allow(dead_code)]
pub fn test_config() -> CatalogConfig {
    CatalogConfig::builder()
        .base_url(TEST_BASE_URL)
        .image_base_url(TEST_IMAGE_BASE_URL)
        .worker_stagger(Duration::from_millis(1))
        .poll_interval(Duration::from_millis(50))
        .build()
        .expect("test config is valid")
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
enum Response {
    Body(Vec<u8>),
    Delayed(Duration, Vec<u8>),
    Error(FetchError),
}

#[allow(dead_code)]
#[derive(Debug, Default)]
struct MockState {
    routes: Vec<(String, Response)>,
    probes: Vec<(String, u16)>,
    requests: Vec<String>,
    probed: Vec<String>,
}

/// In-memory [`Fetcher`] answering by URL substring
///
/// Routes are matched in insertion order; unmatched URLs are 404s. Every
/// fetched and probed URL is recorded. Clones (and forks) share state.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    state: Arc<Mutex<MockState>>,
}

#[allow(dead_code)]
impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, fragment: &str, body: impl Into<Vec<u8>>) -> Self {
        self.push(fragment, Response::Body(body.into()))
    }

    pub fn route_delayed(self, fragment: &str, delay: Duration, body: impl Into<Vec<u8>>) -> Self {
        self.push(fragment, Response::Delayed(delay, body.into()))
    }

    pub fn route_error(self, fragment: &str, error: FetchError) -> Self {
        self.push(fragment, Response::Error(error))
    }

    /// Status returned for probes whose URL contains `fragment` (default 404)
    pub fn probe_status(self, fragment: &str, status: u16) -> Self {
        self.state
            .lock()
            .unwrap()
            .probes
            .push((fragment.to_string(), status));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_containing(&self, fragment: &str) -> usize {
        self.requests().iter().filter(|u| u.contains(fragment)).count()
    }

    pub fn probed(&self) -> Vec<String> {
        self.state.lock().unwrap().probed.clone()
    }

    fn push(self, fragment: &str, response: Response) -> Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .push((fragment.to_string(), response));
        self
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let response = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(url.to_string());
            state
                .routes
                .iter()
                .find(|(fragment, _)| url.contains(fragment.as_str()))
                .map(|(_, response)| response.clone())
        };
        match response {
            Some(Response::Body(body)) => Ok(body),
            Some(Response::Delayed(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            Some(Response::Error(error)) => Err(error),
            None => Err(FetchError::NotFound(url.to_string())),
        }
    }

    async fn probe(&self, url: &str, _timeout: Duration) -> Result<u16, FetchError> {
        let mut state = self.state.lock().unwrap();
        state.probed.push(url.to_string());
        Ok(state
            .probes
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map_or(404, |(_, status)| *status))
    }
}

/// Search results page with one `result_N` container per `(href, title)`
#[allow(dead_code)]
pub fn results_page(links: &[(&str, &str)]) -> String {
    let containers: String = links
        .iter()
        .enumerate()
        .map(|(i, (href, title))| {
            format!(
                r#"<div id="result_{i}" class="s-result-item"><div class="image"><a href="{href}"><img src="x.jpg"></a></div>
                <h3 class="newaps"><a class="title" href="{href}">{title}</a></h3></div>"#
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html><html><head><title>亚马逊.cn : 搜索结果</title></head>
        <body><div id="atfResults">{containers}</div></body></html>"#
    )
}

/// Results page with no result containers at all
#[allow(dead_code)]
pub fn empty_results_page() -> String {
    r#"<!DOCTYPE html><html><head><title>亚马逊.cn : 搜索结果</title></head>
    <body><h1 id="noResultsTitle">没有找到任何与您的搜索相匹配的商品。</h1></body></html>"#
        .to_string()
}

/// What a fixture detail page should contain
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct BookFixture {
    pub asin: &'static str,
    pub title: &'static str,
    pub authors: Vec<&'static str>,
    pub isbn: Option<&'static str>,
}

#[allow(dead_code)]
impl BookFixture {
    pub fn new(asin: &'static str, title: &'static str, authors: &[&'static str]) -> Self {
        Self {
            asin,
            title,
            authors: authors.to_vec(),
            isbn: None,
        }
    }

    pub fn isbn(mut self, isbn: &'static str) -> Self {
        self.isbn = Some(isbn);
        self
    }
}

/// Current-layout detail page for `book`
#[allow(dead_code)]
pub fn detail_page(book: &BookFixture) -> String {
    let authors: String = book
        .authors
        .iter()
        .map(|a| {
            format!(
                r#"<span class="author notFaded"><a class="a-link-normal contributorNameID" href="/e/1">{a}</a>
                <span class="contribution"><span class="a-color-secondary">(作者)</span></span></span>"#
            )
        })
        .collect();
    let isbn_row = book
        .isbn
        .map(|isbn| format!("<tr><td>ISBN:</td><td>{isbn}</td></tr>"))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html><html><head><title>{title} - 亚马逊</title>
<link rel="canonical" href="{base}/{title}/dp/{asin}"></head>
<body>
<div id="centerCol">
  <h1 id="title" class="a-size-large"><span id="productTitle">{title}</span>
    <span class="a-size-medium a-color-secondary a-text-normal">平装</span></h1>
  <div id="byline" class="a-section">{authors}</div>
  <div id="averageCustomerReviews_feature_div" data-feature-name="averageCustomerReviews">
    <span class="a-declarative"><i class="a-icon a-icon-star a-star-4-5" title="平均4.5 星"></i></span>
    <span id="acrCustomerReviewText">128 条商品评论</span>
  </div>
</div>
<div id="imgBlkFront"><img id="main-image" src="https://images-cn.ssl-images-amazon.com/images/I/51Pm4HoXK5L._SX258_BO1,204,203,200_.jpg"></div>
<div id="bookDescription_feature_div"><noscript><div>《{title}》是一部<a href="/gp/x">长篇</a>小说。</div></noscript></div>
<div id="ps-content"><div class="buying"><b>Foundation Series</b> | Series: Foundation (Book 3)</div></div>
<div id="bookDetails_container_div"><div id="nonHeroSection">
  <table><tbody>
    <tr><td>出版社:</td><td>重庆出版社; 第1版 (2008年1月1日)</td></tr>
    <tr><td>语种：</td><td>简体中文</td></tr>
    {isbn_row}
  </tbody></table>
</div></div>
<div class="bucket"><h2>	 查找其它相似商品</h2><div class="content"><ul>
  <li><a href="/b/1">图书</a> › <a href="/b/2">小说</a> › <a href="/b/3">科幻小说</a></li>
  <li><a href="/b/1">图书</a> › <a href="/b/2">小说</a> › <a href="/b/4">Kindle Store</a></li>
  <li><a href="/b/5">Kindle电子书</a> › <a href="/b/2">小说</a> › <a href="/b/6">Books</a></li>
  <li><a href="/b/1">图书</a> › <a href="/b/7">SF, Classic</a> › <a href="/b/8">sf; classic</a></li>
</ul></div></div>
</body></html>"#,
        title = book.title,
        asin = book.asin,
        base = TEST_BASE_URL,
    )
}

/// Detail page whose `#errorMessage` element replaces the product
#[allow(dead_code)]
pub fn error_detail_page() -> String {
    r#"<html><head><title>亚马逊</title></head><body>
    <div id="errorMessage">抱歉，此商品目前无法显示。</div></body></html>"#
        .to_string()
}

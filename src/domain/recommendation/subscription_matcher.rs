//! Subscription and lifestyle brand matching.
//!
//! Sources are tried in priority order: service or brand names the user
//! wrote, names the model emphasized or mentioned in its reply, content
//! keywords mapped to a category, and finally category defaults.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::catalog::{Brand, Subscription};

/// Main subscription and companion lifestyle brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionPick {
    pub main_subscription: Subscription,
    pub life_brand: Option<Brand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentFamily {
    Video,
    Music,
    Reading,
}

impl ContentFamily {
    const ALL: [ContentFamily; 3] = [Self::Video, Self::Music, Self::Reading];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Video => &["영화", "드라마", "예능", "애니", "영상", "ott", "movie", "drama", "video"],
            Self::Music => &["음악", "노래", "음원", "플레이리스트", "music", "song"],
            Self::Reading => &["책", "독서", "웹소설", "오디오북", "book", "reading"],
        }
    }

    fn category_labels(&self) -> &'static [&'static str] {
        match self {
            Self::Video => &["video", "ott", "영상", "동영상"],
            Self::Music => &["music", "음악"],
            Self::Reading => &["ebook", "book", "도서", "전자책", "오디오북"],
        }
    }

    /// Brand description term that pairs with the family.
    fn brand_term(&self) -> &'static str {
        match self {
            Self::Video => "영화",
            Self::Music => "커피",
            Self::Reading => "도서",
        }
    }

    fn of_category(category: &str) -> Option<Self> {
        let category = category.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|family| family.category_labels().iter().any(|l| category.contains(l)))
    }

    fn of_text(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.keywords().iter().any(|k| text.contains(k)))
    }
}

const NAME_ALIASES: [(&str, &str); 7] = [
    ("netflix", "넷플릭스"),
    ("youtube", "유튜브"),
    ("유튭", "유튜브"),
    ("disney", "디즈니"),
    ("melon", "멜론"),
    ("starbucks", "스타벅스"),
    ("스벅", "스타벅스"),
];

const BRAND_HINTS: [(&[&str], &str); 7] = [
    (&["커피", "카페", "라떼", "coffee"], "커피"),
    (&["아이스크림", "디저트", "달달"], "아이스크림"),
    (&["빵", "베이커리"], "베이커리"),
    (&["영화관", "극장", "팝콘"], "영화"),
    (&["서점", "독서", "책"], "도서"),
    (&["편의점"], "편의점"),
    (&["화장품", "뷰티", "스킨케어"], "뷰티"),
];

static EMPHASIZED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:\*\*([^*]{2,30})\*\*|[「『\[]([^」』\]]{2,30})[」』\]]|"([^"]{2,30})")"#)
        .expect("valid regex")
});

/// Picks a main subscription and a lifestyle brand.
///
/// Returns `None` only when the catalog has no subscriptions.
pub fn match_subscription(
    user_texts: &[&str],
    model_reply: Option<&str>,
    subscriptions: &[Subscription],
    brands: &[Brand],
) -> Option<SubscriptionPick> {
    let user = normalize(&user_texts.join(" "));
    let reply_names: Vec<String> = model_reply.map(emphasized_names).unwrap_or_default();
    let reply = model_reply.map(normalize).unwrap_or_default();

    let family = ContentFamily::of_text(&user);

    let main_subscription = find_named(subscriptions, &user, |s| &s.title)
        .or_else(|| reply_names.iter().find_map(|n| find_named(subscriptions, n, |s| &s.title)))
        .or_else(|| find_named(subscriptions, &reply, |s| &s.title))
        .or_else(|| family.and_then(|f| first_of_family(subscriptions, f)))
        .or_else(|| first_of_family(subscriptions, ContentFamily::Video))
        .or_else(|| subscriptions.first())?
        .clone();

    let main_family = ContentFamily::of_category(&main_subscription.category)
        .or(family)
        .unwrap_or(ContentFamily::Video);

    let life_brand = find_named(brands, &user, |b| &b.name)
        .or_else(|| reply_names.iter().find_map(|n| find_named(brands, n, |b| &b.name)))
        .or_else(|| find_named(brands, &reply, |b| &b.name))
        .or_else(|| {
            BRAND_HINTS
                .iter()
                .find(|(keywords, _)| keywords.iter().any(|k| user.contains(k)))
                .and_then(|(_, term)| brand_by_term(brands, term))
        })
        .or_else(|| brand_by_term(brands, main_family.brand_term()))
        .or_else(|| brands.first())
        .cloned();

    Some(SubscriptionPick {
        main_subscription,
        life_brand,
    })
}

/// Catalog subscription titles and brand names mentioned in `text`.
pub fn mentioned_names(text: &str, subscriptions: &[Subscription], brands: &[Brand]) -> Vec<String> {
    let text = normalize(text);
    if text.is_empty() {
        return Vec::new();
    }
    let mentioned = |name: &String| name_keys(name).iter().any(|key| text.contains(key.as_str()));

    subscriptions
        .iter()
        .map(|s| &s.title)
        .filter(|title| mentioned(title))
        .chain(brands.iter().map(|b| &b.name).filter(|name| mentioned(name)))
        .cloned()
        .collect()
}

fn normalize(text: &str) -> String {
    let mut lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    for (alias, canonical) in NAME_ALIASES {
        if lowered.contains(alias) {
            lowered = lowered.replace(alias, canonical);
        }
    }
    lowered
}

/// Keys under which a catalog name may appear in normalized text.
fn name_keys(name: &str) -> Vec<String> {
    let full = normalize(name);
    let mut keys = vec![full.clone()];
    let bare = full.trim_end_matches('+').to_string();
    if bare != full {
        keys.push(bare);
    }
    if let Some(first) = name.split_whitespace().next() {
        let first = normalize(first);
        if first.chars().count() >= 2 && !keys.contains(&first) {
            keys.push(first);
        }
    }
    keys.retain(|k| k.chars().count() >= 2);
    keys
}

fn find_named<'a, T>(items: &'a [T], text: &str, name: impl Fn(&T) -> &String) -> Option<&'a T> {
    if text.is_empty() {
        return None;
    }
    items
        .iter()
        .find(|item| name_keys(name(item)).iter().any(|key| text.contains(key.as_str())))
}

fn emphasized_names(reply: &str) -> Vec<String> {
    EMPHASIZED
        .captures_iter(reply)
        .filter_map(|caps| caps.iter().skip(1).flatten().next().map(|m| normalize(m.as_str())))
        .collect()
}

fn first_of_family(subscriptions: &[Subscription], family: ContentFamily) -> Option<&Subscription> {
    subscriptions
        .iter()
        .find(|s| ContentFamily::of_category(&s.category) == Some(family))
}

fn brand_by_term<'a>(brands: &'a [Brand], term: &str) -> Option<&'a Brand> {
    brands
        .iter()
        .find(|b| b.description.contains(term) || b.name.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(id: i64, title: &str, category: &str) -> Subscription {
        Subscription {
            id,
            title: title.to_string(),
            category: category.to_string(),
            monthly_price_won: 10_000,
            image: String::new(),
        }
    }

    fn brand(id: i64, name: &str, description: &str) -> Brand {
        Brand {
            id,
            name: name.to_string(),
            description: description.to_string(),
            image: String::new(),
        }
    }

    fn subscriptions() -> Vec<Subscription> {
        vec![
            sub(1, "티빙", "video"),
            sub(2, "넷플릭스", "video"),
            sub(3, "유튜브 프리미엄", "video"),
            sub(4, "지니뮤직", "music"),
            sub(5, "밀리의 서재", "ebook"),
        ]
    }

    fn brands() -> Vec<Brand> {
        vec![
            brand(1, "CGV", "영화 관람권 할인"),
            brand(2, "스타벅스", "커피 음료 쿠폰"),
            brand(3, "교보문고", "도서 구매 할인"),
        ]
    }

    fn pick(user: &[&str], reply: Option<&str>) -> SubscriptionPick {
        match_subscription(user, reply, &subscriptions(), &brands()).unwrap()
    }

    mod main_subscription {
        use super::*;

        #[test]
        fn explicit_name_wins() {
            let result = pick(&["영화 좋아하고 넷플릭스 자주 봐요"], None);
            assert_eq!(result.main_subscription.title, "넷플릭스");
        }

        #[test]
        fn english_alias_and_partial_title() {
            assert_eq!(pick(&["Netflix"], None).main_subscription.title, "넷플릭스");
            assert_eq!(pick(&["유튜브 많이 봐"], None).main_subscription.title, "유튜브 프리미엄");
        }

        #[test]
        fn model_emphasis_used_when_user_names_nothing() {
            let result = pick(&["잘 모르겠어요"], Some("이런 분께는 **밀리의 서재**를 추천드려요."));
            assert_eq!(result.main_subscription.title, "밀리의 서재");
        }

        #[test]
        fn keyword_maps_to_category() {
            assert_eq!(pick(&["노래 들으면서 출근해요"], None).main_subscription.title, "지니뮤직");
            assert_eq!(pick(&["책 읽는 걸 좋아해"], None).main_subscription.title, "밀리의 서재");
        }

        #[test]
        fn default_is_first_video_service() {
            assert_eq!(pick(&["글쎄요"], None).main_subscription.title, "티빙");
        }

        #[test]
        fn empty_catalog_yields_none() {
            assert!(match_subscription(&["넷플릭스"], None, &[], &brands()).is_none());
        }
    }

    mod life_brand {
        use super::*;

        #[test]
        fn explicit_brand_name() {
            let result = pick(&["스벅 자주 가요"], None);
            assert_eq!(result.life_brand.unwrap().name, "스타벅스");
        }

        #[test]
        fn keyword_hint() {
            let result = pick(&["카페에서 시간 보내요"], None);
            assert_eq!(result.life_brand.unwrap().name, "스타벅스");
        }

        #[test]
        fn pairs_with_main_category() {
            let result = pick(&["드라마"], None);
            assert_eq!(result.life_brand.unwrap().name, "CGV");
        }

        #[test]
        fn missing_brands_leave_none() {
            let result = match_subscription(&["넷플릭스"], None, &subscriptions(), &[]).unwrap();
            assert!(result.life_brand.is_none());
        }
    }

    mod mentions {
        use super::*;

        #[test]
        fn finds_subscriptions_and_brands_through_aliases() {
            let names = mentioned_names("Netflix랑 스벅 좋아해요", &subscriptions(), &brands());
            assert_eq!(names, vec!["넷플릭스".to_string(), "스타벅스".to_string()]);
        }

        #[test]
        fn nothing_mentioned_is_empty() {
            assert!(mentioned_names("뭐가 좋을까요", &subscriptions(), &brands()).is_empty());
            assert!(mentioned_names("   ", &subscriptions(), &brands()).is_empty());
        }
    }
}

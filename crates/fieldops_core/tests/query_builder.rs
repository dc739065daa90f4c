use fieldops_core::{build, FilterKey, FilterSet, PageRequest, QueryBuilder, SiteIdParam};
use pretty_assertions::assert_eq;

#[test]
fn assignment_scenario_orders_params() {
    let filters = FilterSet::new()
        .with(FilterKey::AssignorId, "A1")
        .with(FilterKey::StartDate, "2024-01-01")
        .with(FilterKey::EndDate, "2024-01-31");

    let descriptor = build("/assignments", &filters, PageRequest::new(20, 10));

    assert_eq!(
        descriptor.path_and_query(),
        "/assignments?offset=20&limit=10&assignedBy=A1&startDate=2024-01-01&endDate=2024-01-31"
    );
}

#[test]
fn every_filter_in_documented_order() {
    let filters = FilterSet::new()
        .with(FilterKey::UserId, "U9")
        .with(FilterKey::EndDate, "2024-02-29")
        .with(FilterKey::SiteId, "S-1")
        .with(FilterKey::StartDate, "2024-02-01")
        .with(FilterKey::AssignorId, "A1");

    let descriptor = build("/assignments", &filters, PageRequest::new(0, 25));
    let keys: Vec<_> = descriptor.query.iter().map(|(k, _)| k.as_str()).collect();

    assert_eq!(
        keys,
        vec![
            "offset",
            "limit",
            "assignedBy",
            "PMSiteId",
            "startDate",
            "endDate",
            "userId"
        ]
    );
}

#[test]
fn site_param_is_screen_specific() {
    let filters = FilterSet::new().with(FilterKey::SiteId, "S-7");
    let builder = QueryBuilder::new("/assignments").with_site_id_param(SiteIdParam::SiteId);

    let descriptor = builder.build(&filters, PageRequest::new(0, 10));

    assert_eq!(descriptor.param("siteId"), Some("S-7"));
    assert_eq!(descriptor.param("PMSiteId"), None);
}

#[test]
fn unset_and_blank_filters_are_omitted() {
    let mut filters = FilterSet::new();
    filters.set(FilterKey::AssignorId, Some(String::new()));
    filters.set(FilterKey::UserId, None);

    let descriptor = build("/assignments", &filters, PageRequest::new(0, 10));

    assert_eq!(descriptor.path_and_query(), "/assignments?offset=0&limit=10");
}

#[test]
fn build_is_deterministic() {
    let filters = FilterSet::new()
        .with(FilterKey::UserId, "U1")
        .with(FilterKey::StartDate, "2024-05-01");
    let page = PageRequest::from_page(3, 50);

    let first = build("/assignments", &filters, page);
    let second = build("/assignments", &filters, page);

    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(first.param("offset"), Some("150"));
}

#[test]
fn values_are_query_encoded() {
    let filters = FilterSet::new().with(FilterKey::SiteId, "north & east");

    let descriptor = build("/assignments", &filters, PageRequest::new(0, 10));

    assert_eq!(
        descriptor.path_and_query(),
        "/assignments?offset=0&limit=10&PMSiteId=north+%26+east"
    );
}

#[test]
fn zero_limit_is_clamped() {
    let page = PageRequest::new(0, 0);
    assert_eq!(page.limit, 1);
    assert_eq!(PageRequest::from_page(2, 0), PageRequest::new(2, 1));
}

#[test]
fn paging_can_be_read_back_and_stripped() {
    let filters = FilterSet::new().with(FilterKey::UserId, "U1");
    let descriptor = build("/users", &filters, PageRequest::from_page(1, 10));

    assert_eq!(descriptor.page(), Some(PageRequest::new(10, 10)));

    let unpaged = descriptor.without_paging();
    assert_eq!(unpaged.page(), None);
    assert_eq!(unpaged.path_and_query(), "/users?userId=U1");
}

pub(crate) fn urljoin(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    format!("{}/{}", base, path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::urljoin;

    #[test]
    fn joins_regardless_of_slashes() {
        assert_eq!(
            urljoin("https://api.correios.com.br/", "srorastro/v1/objetos"),
            "https://api.correios.com.br/srorastro/v1/objetos"
        );
        assert_eq!(
            urljoin("https://api.correios.com.br", "/token/v1/autentica"),
            "https://api.correios.com.br/token/v1/autentica"
        );
    }

    #[test]
    fn absolute_paths_pass_through() {
        assert_eq!(urljoin("https://a", "https://b/c"), "https://b/c");
    }
}

use model::Article;

fn labeled(url: &str, title: &str, source: &str, content: &str, bias: &str) -> Article {
    let mut article = Article::new(url, title, source, content);
    article.ground_truth_bias = Some(bias.to_string());
    article
}

/// A small hand-labeled evaluation set. URLs are synthetic but stable, so
/// repeated benchmark runs upsert rather than duplicate.
pub fn get_test_set() -> Vec<Article> {
    vec![
        labeled(
            "https://eval.example.com/minimum-wage-momentum",
            "Momentum builds for a living wage as workers rally nationwide",
            "Progressive Daily",
            "Tens of thousands of workers marched today demanding the minimum wage \
             finally catch up with decades of productivity growth. Economists aligned \
             with labor argue corporations have pocketed record profits while wages \
             stagnated, and Senator Alvarez called the current floor a poverty trap \
             engineered by corporate lobbyists.",
            "left",
        ),
        labeled(
            "https://eval.example.com/wage-mandate-warning",
            "Small businesses brace for job losses under proposed wage mandate",
            "Liberty Ledger",
            "Business owners warned lawmakers that the proposed wage mandate would \
             force layoffs and automation. The bill, sponsored by Senator Alvarez, \
             ignores basic economics, critics said, and hands Washington yet another \
             lever over private payrolls that should be set by the free market.",
            "right",
        ),
        labeled(
            "https://eval.example.com/wage-bill-committee",
            "Wage bill clears committee on party-line vote",
            "Capitol Wire",
            "The Fair Wage Act cleared the Senate labor committee on a 12-10 \
             party-line vote. The bill would raise the federal minimum wage in \
             three steps over four years. Senator Alvarez, the sponsor, said floor \
             debate is expected next month; opponents promised amendments.",
            "center",
        ),
        labeled(
            "https://eval.example.com/border-crisis-failure",
            "Administration's border failure deepens as crossings surge",
            "Liberty Ledger",
            "Illegal crossings hit another record as the administration clings to \
             policies that have gutted enforcement. Governor Reyes blasted Washington \
             for abandoning border states, saying the White House cares more about \
             activist approval than the rule of law.",
            "right",
        ),
        labeled(
            "https://eval.example.com/asylum-backlog-report",
            "Report: asylum case backlog tops two million",
            "Capitol Wire",
            "A new inspector general report puts the asylum case backlog above two \
             million for the first time. The report attributes the growth to staffing \
             shortfalls and a surge in arrivals, and recommends hiring three hundred \
             additional immigration judges. Governor Reyes and the White House both \
             cited the report in dueling statements.",
            "center",
        ),
        labeled(
            "https://eval.example.com/families-at-the-border",
            "Families seeking safety meet a wall of bureaucracy",
            "Progressive Daily",
            "Advocates describe families fleeing violence who wait years in legal \
             limbo while politicians like Governor Reyes score points on their \
             suffering. Humanitarian groups say the real crisis is a deliberately \
             underfunded asylum system, not the people trapped inside it.",
            "left",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_article_is_labeled_with_a_known_category() {
        let set = get_test_set();
        assert!(!set.is_empty());
        for article in &set {
            let label = article.ground_truth_bias.as_deref().unwrap();
            assert!(matches!(label, "left" | "center" | "right"));
        }
    }

    #[test]
    fn urls_are_unique() {
        let set = get_test_set();
        let mut urls: Vec<&str> = set.iter().map(|a| a.url.as_str()).collect();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), set.len());
    }
}

//! Partitioning of the flat application list into per-stage buckets.

use crate::models::{Application, Stage};

/// Group applications by pipeline stage.
///
/// Every stage appears in the output, in board order, even when its bucket is
/// empty. Within a bucket, applications keep the relative order they had in
/// the input list. Pure and cheap enough to call on every frame.
pub fn group_by_stage(apps: &[Application]) -> Vec<(Stage, Vec<&Application>)> {
    let mut buckets: Vec<Vec<&Application>> = (0..Stage::COUNT).map(|_| Vec::new()).collect();
    for app in apps {
        buckets[app.stage.index()].push(app);
    }
    Stage::ALL.into_iter().zip(buckets).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: i64, stage: Stage) -> Application {
        let mut a = Application::new(format!("Company {}", id), "Role".to_string());
        a.id = Some(id);
        a.stage = stage;
        a
    }

    #[test]
    fn test_empty_input_yields_all_stages() {
        let grouped = group_by_stage(&[]);
        assert_eq!(grouped.len(), Stage::COUNT);
        for (stage, bucket) in &grouped {
            assert!(bucket.is_empty(), "stage {:?} should be empty", stage);
        }
    }

    #[test]
    fn test_partition_completeness() {
        let apps = vec![
            app(1, Stage::Applied),
            app(2, Stage::Offer),
            app(3, Stage::Applied),
            app(4, Stage::Ghosted),
        ];
        let grouped = group_by_stage(&apps);

        let mut seen: Vec<i64> = grouped
            .iter()
            .flat_map(|(_, bucket)| bucket.iter().map(|a| a.id.unwrap()))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_order_preserved_within_bucket() {
        let apps = vec![
            app(10, Stage::Applied),
            app(7, Stage::Offer),
            app(3, Stage::Applied),
            app(22, Stage::Applied),
        ];
        let grouped = group_by_stage(&apps);
        let applied: Vec<i64> = grouped[Stage::Applied.index()]
            .1
            .iter()
            .map(|a| a.id.unwrap())
            .collect();
        assert_eq!(applied, vec![10, 3, 22]);
    }

    #[test]
    fn test_stages_in_board_order() {
        let grouped = group_by_stage(&[]);
        let stages: Vec<Stage> = grouped.iter().map(|(s, _)| *s).collect();
        assert_eq!(stages, Stage::ALL.to_vec());
    }
}

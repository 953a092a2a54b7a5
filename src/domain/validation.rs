use super::models::{GameScore, Prediction, SeriesPrediction};
use crate::errors::LeagueError;
use crate::scoring::types::Score;

pub const MIN_SCORE: Score = 0;
pub const MAX_SCORE: Score = 300;
pub const MAX_SERIES: Score = 900;

pub fn is_valid_score(score: Score) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}

pub fn is_valid_series_prediction(prediction: Score) -> bool {
    (MIN_SCORE..=MAX_SERIES).contains(&prediction)
}

fn out_of_range(field: &str, subject: String, value: Score, max: Score) -> LeagueError {
    LeagueError::Validation {
        field: field.to_string(),
        subject,
        value,
        min: MIN_SCORE,
        max,
    }
}

/// Checks every entered score; the first bad one rejects the whole batch.
pub fn validate_game_scores(games: &[GameScore]) -> Result<(), LeagueError> {
    for game in games {
        if let Some(score) = game.score {
            if !is_valid_score(score) {
                let subject = format!("bowler {} game {}", game.bowler_id, game.game_number);
                return Err(out_of_range("score", subject, score, MAX_SCORE));
            }
        }
    }
    Ok(())
}

pub fn validate_predictions(predictions: &[Prediction]) -> Result<(), LeagueError> {
    for prediction in predictions {
        if prediction.predictor_id == prediction.target_id {
            return Err(LeagueError::SelfPrediction {
                bowler_id: prediction.predictor_id,
            });
        }
        if !is_valid_score(prediction.predicted_score) {
            let subject = format!(
                "bowler {} game {}",
                prediction.target_id, prediction.game_number
            );
            return Err(out_of_range("prediction", subject, prediction.predicted_score, MAX_SCORE));
        }
    }
    Ok(())
}

pub fn validate_series_prediction(prediction: &SeriesPrediction) -> Result<(), LeagueError> {
    if prediction.predictor_id == prediction.target_id {
        return Err(LeagueError::SelfPrediction {
            bowler_id: prediction.predictor_id,
        });
    }
    if !is_valid_series_prediction(prediction.predicted_series) {
        let subject = format!("bowler {} series", prediction.target_id);
        return Err(out_of_range("series prediction", subject, prediction.predicted_series, MAX_SERIES));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::types::GameNumber;

    fn game(bowler_id: i32, game_number: GameNumber, score: Option<Score>) -> GameScore {
        GameScore {
            week_id: 1,
            bowler_id,
            game_number,
            score,
        }
    }

    fn prediction(predictor_id: i32, target_id: i32, predicted_score: Score) -> Prediction {
        Prediction {
            week_id: 1,
            predictor_id,
            target_id,
            game_number: GameNumber::First,
            predicted_score,
        }
    }

    #[test]
    fn test_score_bounds() {
        assert!(is_valid_score(0));
        assert!(is_valid_score(300));
        assert!(!is_valid_score(-1));
        assert!(!is_valid_score(301));
        assert!(is_valid_series_prediction(900));
        assert!(!is_valid_series_prediction(901));
    }

    #[test]
    fn test_batch_rejects_out_of_range_score() {
        let games = vec![
            game(1, GameNumber::First, Some(180)),
            game(1, GameNumber::Second, None),
            game(2, GameNumber::Third, Some(320)),
        ];

        match validate_game_scores(&games) {
            Err(LeagueError::Validation { subject, value, .. }) => {
                assert_eq!(subject, "bowler 2 game 3");
                assert_eq!(value, 320);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_scores_pass_validation() {
        let games = vec![game(1, GameNumber::First, None)];
        assert!(validate_game_scores(&games).is_ok());
    }

    #[test]
    fn test_predictions_reject_self_and_range() {
        assert!(validate_predictions(&[prediction(1, 2, 200)]).is_ok());
        assert!(matches!(
            validate_predictions(&[prediction(3, 3, 200)]),
            Err(LeagueError::SelfPrediction { bowler_id: 3 })
        ));
        assert!(matches!(
            validate_predictions(&[prediction(1, 2, 301)]),
            Err(LeagueError::Validation { max: 300, .. })
        ));
    }

    #[test]
    fn test_series_prediction_range() {
        let mut series = SeriesPrediction {
            week_id: 1,
            predictor_id: 1,
            target_id: 2,
            predicted_series: 900,
        };
        assert!(validate_series_prediction(&series).is_ok());

        series.predicted_series = 901;
        assert!(matches!(
            validate_series_prediction(&series),
            Err(LeagueError::Validation { max: 900, .. })
        ));
    }
}
